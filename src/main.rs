use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use clap::Parser;
use signal_hook::consts::{SIGINT, SIGTERM};
use tracing_subscriber::EnvFilter;

use diagnosys::app;
use diagnosys::config::Config;

/// Interactive host diagnostics and reconnaissance dashboard.
#[derive(Parser, Debug)]
#[command(name = "diagnosys", version, about)]
struct Args {
    /// Seconds between redraws of live views.
    #[arg(long)]
    interval: Option<u64>,

    /// JSON config file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Where logs are written. The terminal belongs to the dashboard.
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Log filter, e.g. `debug` or `diagnosys=trace`. DIAGNOSYS_LOG wins.
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn init_tracing(args: &Args) -> tracing_appender::non_blocking::WorkerGuard {
    let path = args
        .log_file
        .clone()
        .unwrap_or_else(|| std::env::temp_dir().join("diagnosys.log"));
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    let file = path
        .file_name()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("diagnosys.log"));

    let (writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::never(dir, file));
    let filter = EnvFilter::try_from_env("DIAGNOSYS_LOG")
        .unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .init();
    guard
}

fn load_config(args: &Args) -> diagnosys::error::Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(secs) = args.interval {
        config.refresh_interval_secs = secs;
    }
    config.validate()?;
    Ok(config)
}

fn main() -> ExitCode {
    let args = Args::parse();
    let _guard = init_tracing(&args);

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("diagnosys: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let should_quit = Arc::new(AtomicBool::new(false));
    for signal in [SIGINT, SIGTERM] {
        if let Err(e) = signal_hook::flag::register(signal, Arc::clone(&should_quit)) {
            tracing::warn!(signal, error = %e, "failed to register signal handler");
        }
    }

    // Only the main thread owns the terminal. Worker panics come back to it
    // as refresh faults.
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        if std::thread::current().name() == Some("main") {
            app::restore_terminal();
            default_hook(info);
        } else {
            tracing::error!(panic = %info, "worker thread panicked");
        }
    }));

    match app::run(config, should_quit) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "dashboard failed");
            eprintln!("diagnosys: {}", e);
            ExitCode::FAILURE
        }
    }
}
