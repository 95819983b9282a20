//! Firmware, software inventory and directory scan output.

use crossterm::style::Color;

use super::shared::{format_bytes, safe_truncate};
use super::widgets::{BorderStyle, Panel, Table};
use crate::model::{
    DirectoryScan, ELEVATED_MARKER, FirmwareBlob, FirmwareInfo, PackageInventorySummary,
};

/// Bytes of raw tool output shown in the firmware panel.
const BLOB_PREVIEW: usize = 500;
const BLOB_LINE_WIDTH: usize = 100;

pub fn firmware_table(fw: &FirmwareInfo) -> Table {
    let mut t = Table::new("Firmware & Hardware Info")
        .column("Component", Color::Cyan)
        .column("Details", Color::Green);
    t.row(["Platform", fw.platform.as_str()]);
    t.row(["Machine", fw.machine.as_str()]);
    t.row(["Processor", fw.processor.as_str()]);
    if matches!(fw.blob, Some(FirmwareBlob::Unavailable)) {
        t.row(["Firmware", ELEVATED_MARKER]);
    }
    t
}

/// Panel with the head of the raw tool output, if there is any.
pub fn firmware_panel(fw: &FirmwareInfo) -> Option<Panel> {
    let (title, text) = match &fw.blob {
        Some(FirmwareBlob::Bios(text)) => ("BIOS Info (truncated)", text),
        Some(FirmwareBlob::Hardware(text)) => ("Hardware Info (truncated)", text),
        Some(FirmwareBlob::Unavailable) | None => return None,
    };
    Some(
        Panel::new(BorderStyle::Rounded)
            .title(title)
            .text(safe_truncate(text, BLOB_PREVIEW), Color::Grey, BLOB_LINE_WIDTH),
    )
}

pub fn inventory_table(summary: &PackageInventorySummary) -> Table {
    let mut t = Table::new("Software Inventory")
        .column("Package Manager", Color::Cyan)
        .column("Package Count", Color::Green);
    t.row([summary.manager.clone(), summary.count.to_string()]);
    t
}

pub const NO_PACKAGE_MANAGER: &str = "No package managers found or accessible";
pub const INVALID_SCAN_PATH: &str = "Invalid path or permission denied";

/// One-line result of a directory scan, and the color to draw it in.
pub fn scan_summary(scan: Option<&DirectoryScan>) -> (String, Color) {
    match scan {
        Some(s) => (
            format!(
                "Scanned {} items, Total size: {}",
                s.count,
                format_bytes(s.total_size)
            ),
            Color::Green,
        ),
        None => (INVALID_SCAN_PATH.to_string(), Color::Red),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fw(blob: Option<FirmwareBlob>) -> FirmwareInfo {
        FirmwareInfo {
            platform: "Linux".into(),
            machine: "x86_64".into(),
            processor: "AMD Ryzen".into(),
            blob,
        }
    }

    #[test]
    fn unavailable_blob_shows_marker() {
        let info = fw(Some(FirmwareBlob::Unavailable));
        let t = firmware_table(&info);
        assert_eq!(t.rows().last().unwrap()[1], ELEVATED_MARKER);
        assert!(firmware_panel(&info).is_none());
    }

    #[test]
    fn blob_is_truncated_in_panel() {
        let text = "Vendor: Example Corp\n".repeat(100);
        let panel = firmware_panel(&fw(Some(FirmwareBlob::Bios(text)))).unwrap();
        assert_eq!(panel.title.as_deref(), Some("BIOS Info (truncated)"));
        let shown: usize = panel.lines.iter().map(|(l, _)| l.len() + 1).sum();
        assert!(shown <= BLOB_PREVIEW + 1);
    }

    #[test]
    fn no_blob_no_panel() {
        let info = fw(None);
        assert!(firmware_panel(&info).is_none());
        assert_eq!(firmware_table(&info).rows().len(), 3);
    }

    #[test]
    fn scan_summary_lines() {
        let (ok, color) = scan_summary(Some(&DirectoryScan { count: 3, total_size: 1536 }));
        assert_eq!(ok, "Scanned 3 items, Total size: 1.50 KB");
        assert_eq!(color, Color::Green);
        assert_eq!(scan_summary(None).0, INVALID_SCAN_PATH);
    }
}
