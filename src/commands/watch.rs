use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use tracing::{info, warn};

use housekeeper::signal;
use housekeeper::targets::{self, Strictness, WatchRequest};
use housekeeper::{
    DesktopNotifier, Echo, EventSink, HousekeeperError, Notifier, NullNotifier, WatchEngine,
    WatchOutput,
};

use super::load_config;

/// Watch in the foreground until Ctrl+C
pub fn cmd_watch(
    config_path: Option<&Path>,
    only: bool,
    directories: Vec<PathBuf>,
    json: bool,
) -> Result<ExitCode> {
    let config = load_config(config_path)?.with_env_overrides();
    let cwd = std::env::current_dir()?;

    let request = WatchRequest {
        only,
        extra: directories,
    };
    let roots = targets::validate(targets::resolve(&request, &config, &cwd), Strictness::Strict)?;
    if roots.is_empty() {
        return Err(HousekeeperError::NoDirectories.into());
    }

    let notifier: Arc<dyn Notifier> = if config.notifications.enabled {
        Arc::new(DesktopNotifier::new())
    } else {
        Arc::new(NullNotifier)
    };
    let echo = if json { Echo::Json } else { Echo::Silent };
    let sink = EventSink::new(notifier, echo);

    // Before the engine exists so an early Ctrl+C is not lost
    let shutdown = signal::shutdown_channel()?;

    let callback = sink.clone().into_callback();
    let mut engine = WatchEngine::with_backend(config.watch.backend());
    for root in &roots {
        engine.watch_shared(root, Arc::clone(&callback))?;
    }

    let report = engine.start()?;
    for (root, e) in &report.failed {
        warn!("Cannot watch {}: {e}", root.display());
        sink.emit(&WatchOutput::Error {
            message: format!("{}: {e}", root.display()),
        });
    }
    if report.is_empty() {
        engine.stop();
        return Err(HousekeeperError::NoDirectories.into());
    }

    for root in &report.watching {
        info!("Watching: {}", root.display());
    }
    sink.emit(&WatchOutput::WatchStarted {
        directories: report.watching.clone(),
    });

    if !json {
        println!("Press Ctrl+C to stop...");
    }

    let _ = shutdown.recv();

    if !json {
        println!();
        println!("Stopping...");
    }
    engine.stop();
    sink.emit(&WatchOutput::Shutdown);

    Ok(ExitCode::SUCCESS)
}
