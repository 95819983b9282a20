//! Boxed tables and panels drawn with plain box-drawing characters.

use std::io::{self, Write};

use crossterm::{
    queue,
    style::{Attribute, Color, ResetColor, SetAttribute, SetForegroundColor},
};

use super::shared::{truncate_str, write_bold, write_colored, writeln};

/// Widest a single table cell may grow before it is cut.
const MAX_CELL: usize = 48;

/// Border glyphs: top-left, top-right, bottom-left, bottom-right, horizontal, vertical.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BorderStyle {
    Rounded,
    Double,
}

impl BorderStyle {
    fn glyphs(self) -> [char; 6] {
        match self {
            BorderStyle::Rounded => ['╭', '╮', '╰', '╯', '─', '│'],
            BorderStyle::Double => ['╔', '╗', '╚', '╝', '═', '║'],
        }
    }
}

#[derive(Clone, Debug)]
pub struct Column {
    pub header: String,
    pub color: Color,
}

/// A titled grid of text cells, one color per column.
#[derive(Clone, Debug)]
pub struct Table {
    title: String,
    columns: Vec<Column>,
    rows: Vec<Vec<String>>,
    empty_message: Option<String>,
    caption: Option<String>,
}

impl Table {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            columns: Vec::new(),
            rows: Vec::new(),
            empty_message: None,
            caption: None,
        }
    }

    pub fn column(mut self, header: impl Into<String>, color: Color) -> Self {
        self.columns.push(Column { header: header.into(), color });
        self
    }

    /// Placeholder shown in the first cell when the table has no rows.
    pub fn empty_message(mut self, message: impl Into<String>) -> Self {
        self.empty_message = Some(message.into());
        self
    }

    pub fn caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }

    /// Short rows are padded with blanks; extra cells are dropped.
    pub fn row<I, S>(&mut self, cells: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut row: Vec<String> = cells
            .into_iter()
            .take(self.columns.len())
            .map(|c| truncate_str(&c.into(), MAX_CELL))
            .collect();
        row.resize(self.columns.len(), String::new());
        self.rows.push(row);
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Rows as drawn, including the placeholder row of an empty table.
    pub fn display_rows(&self) -> Vec<Vec<String>> {
        match (&self.empty_message, self.rows.is_empty()) {
            (Some(msg), true) => {
                let mut row = vec![String::new(); self.columns.len().max(1)];
                row[0] = msg.clone();
                vec![row]
            }
            _ => self.rows.clone(),
        }
    }

    pub fn widths(&self) -> Vec<usize> {
        let rows = self.display_rows();
        self.columns
            .iter()
            .enumerate()
            .map(|(i, col)| {
                rows.iter()
                    .filter_map(|r| r.get(i))
                    .map(|c| c.chars().count())
                    .chain(std::iter::once(col.header.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect()
    }

    pub fn render(&self, out: &mut impl Write) -> io::Result<()> {
        let widths = self.widths();
        let [tl, tr, bl, br, h, v] = BorderStyle::Rounded.glyphs();

        write!(out, " ")?;
        write_bold(out, &self.title, Color::White)?;
        writeln(out, "")?;

        writeln(out, &rule(tl, '┬', tr, h, &widths))?;
        write!(out, "{}", v)?;
        for (col, w) in self.columns.iter().zip(&widths) {
            write!(out, " ")?;
            queue!(out, SetAttribute(Attribute::Bold))?;
            write!(out, "{}", pad(&col.header, *w))?;
            queue!(out, SetAttribute(Attribute::Reset))?;
            write!(out, " {}", v)?;
        }
        writeln(out, "")?;
        writeln(out, &rule('├', '┼', '┤', h, &widths))?;

        for row in self.display_rows() {
            write!(out, "{}", v)?;
            for ((cell, col), w) in row.iter().zip(&self.columns).zip(&widths) {
                write!(out, " ")?;
                write_colored(out, &pad(cell, *w), col.color)?;
                write!(out, " {}", v)?;
            }
            writeln(out, "")?;
        }
        writeln(out, &rule(bl, '┴', br, h, &widths))?;

        if let Some(caption) = &self.caption {
            queue!(out, SetForegroundColor(Color::DarkGrey))?;
            write!(out, " {}", caption)?;
            queue!(out, ResetColor)?;
            writeln(out, "")?;
        }
        Ok(())
    }
}

/// A titled box around free-form lines.
#[derive(Clone, Debug)]
pub struct Panel {
    pub title: Option<String>,
    pub lines: Vec<(String, Color)>,
    pub border: BorderStyle,
    pub border_color: Color,
}

impl Panel {
    pub fn new(border: BorderStyle) -> Self {
        Self {
            title: None,
            lines: Vec::new(),
            border,
            border_color: Color::DarkGrey,
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn border_color(mut self, color: Color) -> Self {
        self.border_color = color;
        self
    }

    pub fn line(mut self, text: impl Into<String>, color: Color) -> Self {
        self.lines.push((text.into(), color));
        self
    }

    /// Every line of `text`, each cut to `max_width` characters.
    pub fn text(mut self, text: &str, color: Color, max_width: usize) -> Self {
        for line in text.lines() {
            self.lines.push((truncate_str(line.trim_end(), max_width), color));
        }
        self
    }

    pub fn inner_width(&self) -> usize {
        let title = self.title.as_ref().map(|t| t.chars().count() + 2).unwrap_or(0);
        self.lines
            .iter()
            .map(|(l, _)| l.chars().count())
            .chain(std::iter::once(title))
            .max()
            .unwrap_or(0)
    }

    pub fn render(&self, out: &mut impl Write) -> io::Result<()> {
        let width = self.inner_width();
        let [tl, tr, bl, br, h, v] = self.border.glyphs();

        queue!(out, SetForegroundColor(self.border_color))?;
        let top = match &self.title {
            Some(title) => {
                let label = format!(" {} ", title);
                let fill = (width + 2).saturating_sub(label.chars().count() + 1);
                format!("{}{}{}{}{}", tl, h, label, h.to_string().repeat(fill), tr)
            }
            None => format!("{}{}{}", tl, h.to_string().repeat(width + 2), tr),
        };
        write!(out, "{}", top)?;
        queue!(out, ResetColor)?;
        writeln(out, "")?;

        for (line, color) in &self.lines {
            write_colored(out, &v.to_string(), self.border_color)?;
            write!(out, " ")?;
            write_colored(out, &pad(line, width), *color)?;
            write!(out, " ")?;
            write_colored(out, &v.to_string(), self.border_color)?;
            writeln(out, "")?;
        }

        let bottom = format!("{}{}{}", bl, h.to_string().repeat(width + 2), br);
        write_colored(out, &bottom, self.border_color)?;
        writeln(out, "")
    }
}

fn pad(text: &str, width: usize) -> String {
    let len = text.chars().count();
    format!("{}{}", text, " ".repeat(width.saturating_sub(len)))
}

fn rule(left: char, mid: char, right: char, h: char, widths: &[usize]) -> String {
    let segments: Vec<String> = widths.iter().map(|w| h.to_string().repeat(w + 2)).collect();
    format!("{}{}{}", left, segments.join(&mid.to_string()), right)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render_to_string(table: &Table) -> String {
        let mut buf = Vec::new();
        table.render(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn widths_cover_header_and_cells() {
        let mut t = Table::new("T")
            .column("PID", Color::Cyan)
            .column("Name", Color::Yellow);
        t.row(["1", "systemd-journald"]);
        t.row(["12345", "x"]);
        assert_eq!(t.widths(), vec![5, 16]);
    }

    #[test]
    fn rows_are_padded_and_clipped() {
        let mut t = Table::new("T")
            .column("A", Color::Cyan)
            .column("B", Color::Cyan);
        t.row(["only"]);
        t.row(["1", "2", "3"]);
        assert_eq!(t.rows()[0], vec!["only".to_string(), String::new()]);
        assert_eq!(t.rows()[1].len(), 2);
    }

    #[test]
    fn long_cells_are_truncated() {
        let mut t = Table::new("T").column("A", Color::Cyan);
        t.row(["x".repeat(200)]);
        assert_eq!(t.rows()[0][0].chars().count(), MAX_CELL);
        assert!(t.rows()[0][0].ends_with("..."));
    }

    #[test]
    fn empty_table_shows_placeholder_row() {
        let t = Table::new("Listening Ports")
            .column("Address", Color::Cyan)
            .column("Port", Color::Yellow)
            .empty_message("No listening ports found");
        assert_eq!(t.display_rows().len(), 1);
        let text = render_to_string(&t);
        assert!(text.contains("Listening Ports"));
        assert!(text.contains("No listening ports found"));
    }

    #[test]
    fn empty_table_without_placeholder_has_no_rows() {
        let t = Table::new("T").column("A", Color::Cyan);
        assert!(t.display_rows().is_empty());
        assert!(render_to_string(&t).contains('╰'));
    }

    #[test]
    fn lines_end_with_crlf() {
        let mut t = Table::new("T").column("A", Color::Cyan);
        t.row(["v"]);
        let text = render_to_string(&t);
        assert!(text.split('\n').all(|l| l.is_empty() || l.ends_with('\r')));
    }

    #[test]
    fn panel_width_fits_title_and_lines() {
        let p = Panel::new(BorderStyle::Double)
            .title("Main Menu")
            .line("[1] System", Color::White);
        assert_eq!(p.inner_width(), 11);

        let mut buf = Vec::new();
        p.render(&mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("Main Menu"));
        assert!(text.contains('╔'));
        assert!(text.contains('╝'));
    }

    #[test]
    fn panel_text_splits_and_clips_lines() {
        let p = Panel::new(BorderStyle::Rounded).text("a\nbbbbbbbbbb\n", Color::White, 6);
        assert_eq!(p.lines.len(), 2);
        assert_eq!(p.lines[1].0, "bbb...");
    }
}
