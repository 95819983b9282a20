use std::time::Duration;

use crossterm::style::Color;

use super::widgets::{BorderStyle, Panel};
use crate::controller::HostInfo;

pub const TOOL_NAME: &str = "diagnosys";

/// Header lines: banner, host line, and the refresh hint for timed views.
pub fn header_lines(host: &HostInfo, time: &str, refresh: Option<Duration>) -> Vec<String> {
    let mut lines = vec![
        format!("{} - System Diagnostics & Reconnaissance", TOOL_NAME),
        format!(
            "Host: {} | OS: {} {} | Time: {}",
            host.hostname, host.os_name, host.kernel, time
        ),
    ];
    if let Some(every) = refresh {
        lines.push(format!(
            "Refreshing every {}s | q/Esc/Ctrl+C to return",
            every.as_secs()
        ));
    }
    lines
}

pub fn header_panel(host: &HostInfo, time: &str, refresh: Option<Duration>) -> Panel {
    let colors = [Color::Cyan, Color::White, Color::DarkGrey];
    header_lines(host, time, refresh)
        .into_iter()
        .zip(colors)
        .fold(
            Panel::new(BorderStyle::Double).border_color(Color::Cyan),
            |panel, (line, color)| panel.line(line, color),
        )
}
