//! Body of `daemon run`

use std::sync::mpsc::Receiver;
use std::sync::Arc;

use tracing::{info, warn};

use crate::config::Config;
use crate::error::{HousekeeperError, HousekeeperResult};
use crate::notifier::{DesktopNotifier, Notifier, NullNotifier};
use crate::sink::{Echo, EventSink};
use crate::targets::{self, Strictness, WatchRequest};
use crate::watcher::WatchEngine;

use super::PidFile;

/// Watch the configured roots until `shutdown` fires.
///
/// Holds the PID file lock for the whole run. Roots that are not directories
/// are skipped; having none left is an error.
pub fn run_until(config: &Config, pid_file: &PidFile, shutdown: Receiver<()>) -> HousekeeperResult<()> {
    let _guard = pid_file.acquire(std::process::id())?;

    let cwd = std::env::current_dir()?;
    let candidates = targets::resolve(&WatchRequest::default(), config, &cwd);
    let roots = targets::validate(candidates, Strictness::Lenient)?;

    let notifier: Arc<dyn Notifier> = if config.notifications.enabled {
        Arc::new(DesktopNotifier::new())
    } else {
        Arc::new(NullNotifier)
    };
    let callback = EventSink::new(notifier, Echo::Silent).into_callback();

    let mut engine = WatchEngine::with_backend(config.watch.backend());
    for root in &roots {
        engine.watch_shared(root, Arc::clone(&callback))?;
    }

    let report = engine.start()?;
    for (root, e) in &report.failed {
        warn!("Cannot watch {}: {e}", root.display());
    }
    if report.is_empty() {
        engine.stop();
        return Err(HousekeeperError::NoDirectories);
    }
    for root in &report.watching {
        info!("Watching: {}", root.display());
    }

    info!("Daemon started");
    // A dropped sender counts as a stop request
    let _ = shutdown.recv();
    info!("Daemon stopping");

    engine.stop();
    Ok(())
}
