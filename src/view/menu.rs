use crossterm::style::Color;

use super::widgets::{BorderStyle, Panel};
use crate::model::AppView;

pub fn menu_panel() -> Panel {
    let mut panel = Panel::new(BorderStyle::Rounded)
        .title("Main Menu")
        .border_color(Color::Cyan)
        .line("LIVE VIEWS (auto-refresh)", Color::Yellow);
    for view in AppView::ALL.iter().filter(|v| v.auto_refresh()) {
        panel = panel.line(menu_entry(*view), Color::White);
    }
    panel = panel
        .line("", Color::White)
        .line("SNAPSHOTS", Color::Yellow);
    for view in AppView::ALL.iter().filter(|v| !v.auto_refresh()) {
        panel = panel.line(menu_entry(*view), Color::White);
    }
    panel.line("", Color::White).line("[q] Quit", Color::White)
}

pub fn menu_entry(view: AppView) -> String {
    format!("[{}] {}", view.key(), view.title())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_view_is_listed_once() {
        let panel = menu_panel();
        for view in AppView::ALL {
            let entry = menu_entry(view);
            assert_eq!(panel.lines.iter().filter(|(l, _)| *l == entry).count(), 1);
        }
        assert!(panel.lines.iter().any(|(l, _)| l == "[q] Quit"));
    }

    #[test]
    fn entry_format() {
        assert_eq!(menu_entry(AppView::DirectoryScan), "[9] Directory Scan");
    }
}
