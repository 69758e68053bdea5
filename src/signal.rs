//! SIGINT/SIGTERM handling

use std::sync::mpsc::{self, Receiver};

use crate::error::{HousekeeperError, HousekeeperResult};

/// Receiver that yields once per SIGINT/SIGTERM (Ctrl+C on Windows).
///
/// Installs the process-wide handler, so it can be called only once.
pub fn shutdown_channel() -> HousekeeperResult<Receiver<()>> {
    let (tx, rx) = mpsc::channel();

    ctrlc::set_handler(move || {
        let _ = tx.send(());
    })
    .map_err(|e| HousekeeperError::SubsystemInit {
        target: "signal handler".to_string(),
        reason: e.to_string(),
    })?;

    Ok(rx)
}
