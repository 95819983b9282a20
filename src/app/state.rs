use crate::model::AppView;

/// Where the application is.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Screen {
    MainMenu,
    View(AppView),
    Quit,
}

/// What a key press (or a signal) asks for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Select(AppView),
    /// Esc.
    Back,
    /// q / Q.
    Quit,
    /// Ctrl+C.
    Interrupt,
    /// SIGINT or SIGTERM delivered to the process.
    Terminate,
    Other,
}

impl Screen {
    pub fn next(self, command: Command) -> Screen {
        match (self, command) {
            (_, Command::Terminate) | (Screen::Quit, _) => Screen::Quit,

            (Screen::MainMenu, Command::Select(view)) => Screen::View(view),
            (Screen::MainMenu, Command::Quit | Command::Interrupt) => Screen::Quit,
            (Screen::MainMenu, _) => Screen::MainMenu,

            // Live views only leave on an explicit exit key.
            (Screen::View(view), Command::Select(_) | Command::Other) if view.auto_refresh() => {
                Screen::View(view)
            }
            (Screen::View(_), _) => Screen::MainMenu,
        }
    }
}
