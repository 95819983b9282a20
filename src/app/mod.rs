mod input;
mod refresh;
mod render;
mod state;

use std::io::{self, Stdout};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use crossterm::{
    cursor,
    event::{self, Event, KeyEvent, KeyEventKind},
    execute,
    terminal::{
        Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode,
        enable_raw_mode,
    },
};
use tokio::runtime::Runtime;

use crate::collectors::tool::ToolRunner;
use crate::config::Config;
use crate::controller::{InventoryCollector, Monitor};
use crate::error::Result;
use crate::model::AppView;
use crate::view::Renderer;

pub use input::{Edit, LineEditor, command};
pub use refresh::AutoRefresh;
pub use render::Dashboard;
pub use state::{Command, Screen};

/// How often the input loop wakes to check the signal flag.
const POLL: Duration = Duration::from_millis(100);

type SharedDashboard = Arc<Mutex<Dashboard<Stdout>>>;

/// Restore the terminal to normal mode. Safe to call multiple times.
pub fn restore_terminal() {
    let _ = execute!(io::stdout(), cursor::Show, LeaveAlternateScreen);
    let _ = disable_raw_mode();
}

/// Run the dashboard until the user quits or `should_quit` is raised.
/// The terminal is restored on every exit path.
pub fn run(config: Config, should_quit: Arc<AtomicBool>) -> Result<()> {
    let rt = Arc::new(
        tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .worker_threads(2)
            .build()?,
    );

    let period = config.refresh_interval();
    let monitor = Monitor::new(&config, ToolRunner::new(Arc::clone(&rt), config.tool_timeout()));
    let inventory = InventoryCollector::new(Arc::clone(&rt), &config);
    let dash = Arc::new(Mutex::new(Dashboard::new(
        monitor,
        inventory,
        Renderer::new(io::stdout()),
        period,
    )));

    enable_raw_mode()?;
    let result = execute!(
        io::stdout(),
        EnterAlternateScreen,
        Clear(ClearType::All),
        cursor::Hide
    )
    .map_err(Into::into)
    .and_then(|_| {
        tracing::info!(interval_secs = period.as_secs(), "dashboard started");
        event_loop(&dash, &rt, period, &should_quit)
    });

    restore_terminal();
    tracing::info!("dashboard stopped");
    result
}

fn lock(dash: &SharedDashboard) -> MutexGuard<'_, Dashboard<Stdout>> {
    dash.lock().unwrap_or_else(PoisonError::into_inner)
}

fn event_loop(
    dash: &SharedDashboard,
    rt: &Runtime,
    period: Duration,
    should_quit: &AtomicBool,
) -> Result<()> {
    let mut screen = Screen::MainMenu;
    loop {
        screen = match screen {
            Screen::Quit => return Ok(()),
            Screen::MainMenu => {
                lock(dash).draw_menu()?;
                screen.next(wait_command(should_quit)?)
            }
            Screen::View(AppView::DirectoryScan) => run_scan(dash, should_quit)?,
            Screen::View(view) if view.auto_refresh() => {
                run_live(dash, rt, view, period, should_quit)?
            }
            Screen::View(view) => run_static(dash, view, should_quit)?,
        };
    }
}

/// What woke the input loop.
enum Wake {
    Key(KeyEvent),
    /// A signal asked us to stop.
    Signal,
    /// The live view's refresh failed.
    Fault(String),
}

/// Block until a key press, a signal, or a failure reported by `refresh`.
fn wait(should_quit: &AtomicBool, refresh: Option<&AutoRefresh>) -> io::Result<Wake> {
    loop {
        if should_quit.load(Ordering::Relaxed) {
            return Ok(Wake::Signal);
        }
        if let Some(fault) = refresh.and_then(AutoRefresh::fault) {
            return Ok(Wake::Fault(fault));
        }
        if event::poll(POLL)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    return Ok(Wake::Key(key));
                }
            }
        }
    }
}

/// Next key press, or `None` once a signal has asked us to stop.
fn next_key(should_quit: &AtomicBool) -> io::Result<Option<KeyEvent>> {
    match wait(should_quit, None)? {
        Wake::Key(key) => Ok(Some(key)),
        Wake::Signal | Wake::Fault(_) => Ok(None),
    }
}

fn wait_command(should_quit: &AtomicBool) -> io::Result<Command> {
    Ok(next_key(should_quit)?.map_or(Command::Terminate, command))
}

fn run_live(
    dash: &SharedDashboard,
    rt: &Runtime,
    view: AppView,
    period: Duration,
    should_quit: &AtomicBool,
) -> Result<Screen> {
    let drawn = lock(dash).draw_view(view);
    if let Err(e) = drawn {
        return show_fault(dash, &e.to_string(), should_quit);
    }

    let shared = Arc::clone(dash);
    let refresh = AutoRefresh::start(rt.handle(), period, move || lock(&shared).draw_view(view));

    let current = Screen::View(view);
    let outcome = loop {
        match wait(should_quit, Some(&refresh)) {
            Ok(Wake::Key(key)) => {
                let next = current.next(command(key));
                if next != current {
                    break Ok(Ok(next));
                }
            }
            Ok(Wake::Signal) => break Ok(Ok(Screen::Quit)),
            Ok(Wake::Fault(fault)) => break Ok(Err(fault)),
            Err(e) => break Err(e),
        }
    };

    rt.block_on(refresh.stop());
    match outcome? {
        Ok(next) => Ok(next),
        Err(fault) => show_fault(dash, &fault, should_quit),
    }
}

fn run_static(dash: &SharedDashboard, view: AppView, should_quit: &AtomicBool) -> Result<Screen> {
    let drawn = lock(dash).draw_view(view);
    if let Err(e) = drawn {
        return show_fault(dash, &e.to_string(), should_quit);
    }
    Ok(Screen::View(view).next(wait_command(should_quit)?))
}

fn run_scan(dash: &SharedDashboard, should_quit: &AtomicBool) -> Result<Screen> {
    let mut editor = LineEditor::new();
    loop {
        lock(dash).draw_scan_prompt(editor.text())?;
        let Some(key) = next_key(should_quit)? else {
            return Ok(Screen::Quit);
        };
        match editor.handle(key) {
            Edit::Pending => {}
            Edit::Cancel => return Ok(Screen::MainMenu),
            Edit::Submit(path) => {
                let drawn = lock(dash).draw_scan(Path::new(&path));
                if let Err(e) = drawn {
                    return show_fault(dash, &e.to_string(), should_quit);
                }
                let cmd = wait_command(should_quit)?;
                return Ok(Screen::View(AppView::DirectoryScan).next(cmd));
            }
        }
    }
}

/// Show a failed render as an error line, then go back to the menu on the
/// next key.
fn show_fault(dash: &SharedDashboard, message: &str, should_quit: &AtomicBool) -> Result<Screen> {
    tracing::warn!(error = %message, "render failed");
    lock(dash).draw_error(message)?;
    let next = match wait_command(should_quit)? {
        Command::Terminate => Screen::Quit,
        _ => Screen::MainMenu,
    };
    Ok(next)
}
