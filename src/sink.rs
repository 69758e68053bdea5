//! Creation event sink: log line, optional NDJSON echo, desktop notification

use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use serde::Serialize;
use tracing::{debug, info};

use crate::notifier::{message_for, Notifier};
use crate::watcher::{Callback, CreationEvent, ItemType};

/// Stdout echo of events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Echo {
    /// Log only
    #[default]
    Silent,
    /// One JSON object per line on stdout
    Json,
}

/// Watch output events for NDJSON
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum WatchOutput {
    WatchStarted { directories: Vec<PathBuf> },
    Created { path: PathBuf, item_type: ItemType },
    Error { message: String },
    Shutdown,
}

impl WatchOutput {
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}

impl From<&CreationEvent> for WatchOutput {
    fn from(event: &CreationEvent) -> Self {
        WatchOutput::Created {
            path: event.path.clone(),
            item_type: event.item_type,
        }
    }
}

type SharedWriter = Arc<Mutex<Box<dyn Write + Send>>>;

/// Receives every creation event from the engine
#[derive(Clone)]
pub struct EventSink {
    notifier: Arc<dyn Notifier>,
    echo: Echo,
    out: SharedWriter,
}

impl EventSink {
    pub fn new(notifier: Arc<dyn Notifier>, echo: Echo) -> Self {
        Self::with_writer(notifier, echo, Box::new(io::stdout()))
    }

    /// Same as [`new`](Self::new), echoing into `out` instead of stdout
    pub fn with_writer(notifier: Arc<dyn Notifier>, echo: Echo, out: Box<dyn Write + Send>) -> Self {
        Self {
            notifier,
            echo,
            out: Arc::new(Mutex::new(out)),
        }
    }

    /// Write one NDJSON line when echoing JSON
    pub fn emit(&self, output: &WatchOutput) {
        if self.echo != Echo::Json {
            return;
        }
        let mut out = self.out.lock().unwrap_or_else(|e| e.into_inner());
        if writeln!(out, "{}", output.to_json()).and_then(|_| out.flush()).is_err() {
            debug!("stdout closed; dropping event output");
        }
    }

    pub fn handle(&self, event: CreationEvent) {
        info!("New {}: {}", event.item_type, event.path.display());

        self.emit(&WatchOutput::from(&event));

        let (title, body) = message_for(&event);
        if let Err(e) = self.notifier.notify(&title, &body) {
            debug!("Notification not shown: {e}");
        }
    }

    /// Engine callback that feeds this sink
    pub fn into_callback(self) -> Callback {
        Arc::new(move |event: CreationEvent| self.handle(event))
    }
}
