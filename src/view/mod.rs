mod header;
mod inventory;
mod menu;
mod recon;
mod shared;
mod system;
mod widgets;

use std::io::{self, Write};

use crossterm::{
    cursor, queue,
    style::Color,
    terminal::{Clear, ClearType},
};

pub use header::{TOOL_NAME, header_lines, header_panel};
pub use inventory::{
    INVALID_SCAN_PATH, NO_PACKAGE_MANAGER, firmware_panel, firmware_table, inventory_table,
    scan_summary,
};
pub use menu::{menu_entry, menu_panel};
pub use recon::{
    connections_table, external_table, listening_table, process_table, summary_table, user_table,
};
pub use shared::{format_bytes, format_number, progress_bar, safe_truncate, truncate_str};
pub use system::{
    boot_table, cpu_table, disk_table, interface_tables, io_stats_table, memory_table,
    per_core_table,
};
pub use widgets::{BorderStyle, Panel, Table};

/// One drawable piece of a screen.
#[derive(Clone, Debug)]
pub enum Block {
    Table(Table),
    Panel(Panel),
    Line(String, Color),
}

/// Draws blocks to any writer. The application hands it stdout; tests hand
/// it a byte buffer.
pub struct Renderer<W: Write> {
    out: W,
}

impl<W: Write> Renderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Clear the screen and home the cursor.
    pub fn begin_frame(&mut self) -> io::Result<()> {
        queue!(self.out, Clear(ClearType::All), cursor::MoveTo(0, 0))
    }

    pub fn block(&mut self, block: &Block) -> io::Result<()> {
        match block {
            Block::Table(t) => t.render(&mut self.out),
            Block::Panel(p) => p.render(&mut self.out),
            Block::Line(text, color) => self.line(text, *color),
        }
    }

    /// Blocks separated by one blank line.
    pub fn blocks(&mut self, blocks: &[Block]) -> io::Result<()> {
        for (i, block) in blocks.iter().enumerate() {
            if i > 0 {
                shared::writeln(&mut self.out, "")?;
            }
            self.block(block)?;
        }
        Ok(())
    }

    pub fn line(&mut self, text: &str, color: Color) -> io::Result<()> {
        shared::write_colored(&mut self.out, text, color)?;
        shared::writeln(&mut self.out, "")
    }

    /// Redraw the current line as `label` followed by what has been typed.
    pub fn prompt(&mut self, label: &str, input: &str) -> io::Result<()> {
        queue!(self.out, cursor::MoveToColumn(0), Clear(ClearType::CurrentLine))?;
        shared::write_bold(&mut self.out, label, Color::Cyan)?;
        write!(self.out, "{}", input)?;
        queue!(self.out, cursor::Show)
    }

    pub fn hide_cursor(&mut self) -> io::Result<()> {
        queue!(self.out, cursor::Hide)
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn output(r: Renderer<Vec<u8>>) -> String {
        String::from_utf8(r.into_inner()).unwrap()
    }

    #[test]
    fn blocks_are_separated_by_blank_lines() {
        let mut r = Renderer::new(Vec::new());
        r.blocks(&[
            Block::Line("first".into(), Color::White),
            Block::Line("second".into(), Color::White),
        ])
        .unwrap();
        let text = output(r);
        let first = text.find("first").unwrap();
        let second = text.find("second").unwrap();
        assert!(text[first..second].contains("\r\n\r\n"));
    }

    #[test]
    fn prompt_echoes_input() {
        let mut r = Renderer::new(Vec::new());
        r.prompt("Enter directory path [.]: ", "/var/log").unwrap();
        let text = output(r);
        assert!(text.contains("Enter directory path [.]: "));
        assert!(text.contains("/var/log"));
    }
}
