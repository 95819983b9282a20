use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::model::AppView;

use super::state::Command;

fn is_ctrl_c(key: &KeyEvent) -> bool {
    key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL)
}

/// Map a key press to a command. Menu digits select views.
pub fn command(key: KeyEvent) -> Command {
    if is_ctrl_c(&key) {
        return Command::Interrupt;
    }
    match key.code {
        KeyCode::Char('q') | KeyCode::Char('Q') => Command::Quit,
        KeyCode::Esc => Command::Back,
        KeyCode::Char(c) => AppView::from_key(c).map_or(Command::Other, Command::Select),
        _ => Command::Other,
    }
}

/// Result of feeding one key to a [`LineEditor`].
#[derive(Debug, PartialEq, Eq)]
pub enum Edit {
    Pending,
    Submit(String),
    Cancel,
}

/// Single-line text entry for the directory prompt.
#[derive(Debug, Default)]
pub struct LineEditor {
    buffer: String,
}

impl LineEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.buffer
    }

    /// Enter submits the trimmed input, or `.` when nothing was typed.
    pub fn handle(&mut self, key: KeyEvent) -> Edit {
        if is_ctrl_c(&key) {
            return Edit::Cancel;
        }
        match key.code {
            KeyCode::Esc => Edit::Cancel,
            KeyCode::Enter => {
                let input = self.buffer.trim();
                let path = if input.is_empty() { "." } else { input };
                Edit::Submit(path.to_string())
            }
            KeyCode::Backspace => {
                self.buffer.pop();
                Edit::Pending
            }
            KeyCode::Char(c) => {
                self.buffer.push(c);
                Edit::Pending
            }
            _ => Edit::Pending,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl_c() -> KeyEvent {
        KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)
    }

    #[test]
    fn menu_keys() {
        assert_eq!(
            command(key(KeyCode::Char('1'))),
            Command::Select(AppView::SystemDiagnostics)
        );
        assert_eq!(
            command(key(KeyCode::Char('9'))),
            Command::Select(AppView::DirectoryScan)
        );
        assert_eq!(command(key(KeyCode::Char('0'))), Command::Other);
        assert_eq!(command(key(KeyCode::Char('x'))), Command::Other);
        assert_eq!(command(key(KeyCode::Up)), Command::Other);
    }

    #[test]
    fn exit_keys() {
        assert_eq!(command(key(KeyCode::Char('q'))), Command::Quit);
        assert_eq!(command(key(KeyCode::Char('Q'))), Command::Quit);
        assert_eq!(command(key(KeyCode::Esc)), Command::Back);
        assert_eq!(command(ctrl_c()), Command::Interrupt);
        // A bare 'c' is just another key.
        assert_eq!(command(key(KeyCode::Char('c'))), Command::Other);
    }

    #[test]
    fn editor_collects_and_submits() {
        let mut ed = LineEditor::new();
        for c in "/tmpx".chars() {
            assert_eq!(ed.handle(key(KeyCode::Char(c))), Edit::Pending);
        }
        ed.handle(key(KeyCode::Backspace));
        assert_eq!(ed.text(), "/tmp");
        assert_eq!(ed.handle(key(KeyCode::Enter)), Edit::Submit("/tmp".into()));
    }

    #[test]
    fn editor_defaults_to_current_dir() {
        let mut ed = LineEditor::new();
        ed.handle(key(KeyCode::Char(' ')));
        assert_eq!(ed.handle(key(KeyCode::Enter)), Edit::Submit(".".into()));
    }

    #[test]
    fn editor_cancels() {
        let mut ed = LineEditor::new();
        assert_eq!(ed.handle(key(KeyCode::Esc)), Edit::Cancel);
        assert_eq!(ed.handle(ctrl_c()), Edit::Cancel);
    }

    #[test]
    fn backspace_on_empty_is_harmless() {
        let mut ed = LineEditor::new();
        assert_eq!(ed.handle(key(KeyCode::Backspace)), Edit::Pending);
        assert_eq!(ed.text(), "");
    }
}
