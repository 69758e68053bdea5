//! Watch engine: root registration and notification-thread lifecycle
//!
//! ```text
//! caller ──watch()──► roots ──start()──► housekeeper-watch thread
//!                                          │  owns the notify watcher
//!   notify thread ──Message::Fs──► channel ┘  normalizes, dedups, dispatches
//! caller ──stop()───► Message::Shutdown ──► thread exits ──► join
//! ```

use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, SyncSender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use notify::{Event, RecursiveMode};
use tracing::{debug, error, info, warn};

use crate::error::{HousekeeperError, HousekeeperResult};

use super::backend::{self, Backend};
use super::event::CreationEvent;
use super::normalizer::{DirectChildFilter, EventNormalizer, RecentCreations};

/// Name of the engine-owned notification thread
pub const THREAD_NAME: &str = "housekeeper-watch";

/// Bound after which a slow shutdown is reported
pub const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

/// Callback invoked on the notification thread for each creation
pub type Callback = Arc<dyn Fn(CreationEvent) + Send + Sync + 'static>;

/// A registered directory and the callback bound to it
#[derive(Clone)]
pub struct WatchRoot {
    path: PathBuf,
    callback: Callback,
}

impl WatchRoot {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl fmt::Debug for WatchRoot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WatchRoot")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

/// Engine lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Idle,
    Running,
}

/// Outcome of bringing the notification subsystem up
#[derive(Debug, Default)]
pub struct StartReport {
    /// Roots that are being watched
    pub watching: Vec<PathBuf>,
    /// Roots that could not be attached, with the reason
    pub failed: Vec<(PathBuf, HousekeeperError)>,
}

impl StartReport {
    /// True when no root could be attached
    pub fn is_empty(&self) -> bool {
        self.watching.is_empty()
    }
}

enum Message {
    Fs(notify::Result<Event>),
    Add(WatchRoot),
    Shutdown,
}

struct Session {
    tx: Sender<Message>,
    handle: JoinHandle<()>,
    /// Disconnects when the notification thread ends
    done: Receiver<()>,
}

/// Watches a set of directories and reports their new direct children.
///
/// Callbacks run on the engine's own thread, never on the caller's.
pub struct WatchEngine {
    backend: Backend,
    roots: Vec<WatchRoot>,
    running: Arc<AtomicBool>,
    session: Option<Session>,
}

impl WatchEngine {
    pub fn new() -> Self {
        Self::with_backend(Backend::default())
    }

    pub fn with_backend(backend: Backend) -> Self {
        Self {
            backend,
            roots: Vec::new(),
            running: Arc::new(AtomicBool::new(false)),
            session: None,
        }
    }

    pub fn backend(&self) -> Backend {
        self.backend
    }

    /// Register `directory`; `on_created` is called once per new direct child.
    ///
    /// Only absolute paths are accepted. Existence is checked at `start()`.
    /// While running, the root is attached by the notification thread.
    pub fn watch<F>(&mut self, directory: impl Into<PathBuf>, on_created: F) -> HousekeeperResult<()>
    where
        F: Fn(CreationEvent) + Send + Sync + 'static,
    {
        self.watch_shared(directory, Arc::new(on_created))
    }

    /// Same as [`watch`](Self::watch) with an already shared callback
    pub fn watch_shared(&mut self, directory: impl Into<PathBuf>, on_created: Callback) -> HousekeeperResult<()> {
        let path = directory.into();
        if !path.is_absolute() {
            return Err(HousekeeperError::InvalidWatchRoot {
                path,
                reason: "path must be absolute".to_string(),
            });
        }

        let root = WatchRoot {
            path,
            callback: on_created,
        };

        if let Some(session) = &self.session {
            if session.tx.send(Message::Add(root.clone())).is_err() {
                warn!(
                    "Notification thread is gone; {} will be watched after restart",
                    root.path.display()
                );
            }
        }

        self.roots.push(root);
        Ok(())
    }

    /// Registered roots, in registration order
    pub fn roots(&self) -> impl Iterator<Item = &Path> {
        self.roots.iter().map(|r| r.path.as_path())
    }

    /// Bring up the notification thread and attach every root.
    ///
    /// Blocks until the backend is initialised. Roots that fail to attach are
    /// listed in the report; the others are watched.
    pub fn start(&mut self) -> HousekeeperResult<StartReport> {
        if self.session.is_some() {
            return Err(HousekeeperError::AlreadyRunning {
                what: "watch engine".to_string(),
            });
        }

        let (tx, rx) = mpsc::channel();
        let (ready_tx, ready_rx) = mpsc::sync_channel(1);
        let (done_tx, done_rx) = mpsc::channel::<()>();

        let backend = self.backend;
        let roots = self.roots.clone();
        let handler_tx = tx.clone();

        let handle = thread::Builder::new()
            .name(THREAD_NAME.to_string())
            .spawn(move || {
                let _done = done_tx;
                notification_loop(backend, roots, handler_tx, rx, ready_tx);
            })?;

        match ready_rx.recv() {
            Ok(Ok(report)) => {
                self.running.store(true, Ordering::SeqCst);
                self.session = Some(Session {
                    tx,
                    handle,
                    done: done_rx,
                });
                info!(
                    "Watch engine started ({} backend, {} of {} roots)",
                    self.backend.name(),
                    report.watching.len(),
                    self.roots.len()
                );
                Ok(report)
            }
            Ok(Err(e)) => {
                let _ = handle.join();
                Err(e)
            }
            Err(_) => {
                let _ = handle.join();
                Err(HousekeeperError::SubsystemInit {
                    target: format!("{} backend", self.backend.name()),
                    reason: "notification thread exited during startup".to_string(),
                })
            }
        }
    }

    /// Shut the notification thread down and wait for it.
    ///
    /// No callback runs after this returns. Does nothing when idle.
    pub fn stop(&mut self) {
        let Some(session) = self.session.take() else {
            return;
        };

        let _ = session.tx.send(Message::Shutdown);

        if let Err(RecvTimeoutError::Timeout) = session.done.recv_timeout(SHUTDOWN_TIMEOUT) {
            error!(
                "{}; still waiting",
                HousekeeperError::ShutdownTimeout {
                    what: "notification thread".to_string(),
                    timeout: SHUTDOWN_TIMEOUT,
                }
            );
        }

        if session.handle.join().is_err() {
            error!("Notification thread panicked");
        }

        self.running.store(false, Ordering::SeqCst);
        info!("Watch engine stopped");
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    pub fn state(&self) -> EngineState {
        if self.is_running() {
            EngineState::Running
        } else {
            EngineState::Idle
        }
    }

    /// Shared running flag for observers on other threads
    pub fn running_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.running)
    }
}

impl Default for WatchEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for WatchEngine {
    fn drop(&mut self) {
        self.stop();
    }
}

/// A root as seen from the notification thread
struct Subscriber {
    filter: DirectChildFilter,
    callback: Callback,
    recent: RecentCreations,
}

impl Subscriber {
    fn new(root: WatchRoot) -> Self {
        Self {
            filter: DirectChildFilter::new(root.path),
            callback: root.callback,
            recent: RecentCreations::new(),
        }
    }
}

fn notification_loop(
    backend: Backend,
    roots: Vec<WatchRoot>,
    tx: Sender<Message>,
    rx: Receiver<Message>,
    ready: SyncSender<HousekeeperResult<StartReport>>,
) {
    let mut watcher = match backend.create(move |res: notify::Result<Event>| {
        let _ = tx.send(Message::Fs(res));
    }) {
        Ok(watcher) => watcher,
        Err(e) => {
            let _ = ready.send(Err(e));
            return;
        }
    };

    let mode = backend.recursive_mode();
    let mut report = StartReport::default();
    let mut subscribers = Vec::with_capacity(roots.len());

    for root in roots {
        match backend::subscribe(watcher.as_mut(), &root.path, mode) {
            Ok(()) => {
                debug!("Subscribed: {}", root.path.display());
                report.watching.push(root.path.clone());
                subscribers.push(Subscriber::new(root));
            }
            Err(e) => {
                warn!("Skipping {}: {e}", root.path.display());
                report.failed.push((root.path, e));
            }
        }
    }

    if ready.send(Ok(report)).is_err() {
        return;
    }

    while let Ok(message) = rx.recv() {
        match message {
            Message::Fs(Ok(event)) => dispatch(&mut subscribers, event),
            Message::Fs(Err(e)) => warn!("Notification backend error: {e}"),
            Message::Add(root) => add_root(watcher.as_mut(), mode, &mut subscribers, root),
            Message::Shutdown => break,
        }
    }

    drop(watcher);
    debug!("Notification thread finished");
}

fn add_root(
    watcher: &mut dyn notify::Watcher,
    mode: RecursiveMode,
    subscribers: &mut Vec<Subscriber>,
    root: WatchRoot,
) {
    match backend::subscribe(watcher, &root.path, mode) {
        Ok(()) => {
            info!("Watching: {}", root.path.display());
            subscribers.push(Subscriber::new(root));
        }
        Err(e) => warn!("Skipping {}: {e}", root.path.display()),
    }
}

fn dispatch(subscribers: &mut [Subscriber], event: Event) {
    for path in backend::vacated_paths(&event) {
        for subscriber in subscribers.iter_mut() {
            subscriber.recent.forget(path);
        }
    }

    for raw in backend::raw_events(event) {
        let now = Instant::now();
        for subscriber in subscribers.iter_mut() {
            let Some(creation) = subscriber.filter.classify(&raw) else {
                continue;
            };
            if !subscriber.recent.first_sighting(&creation.path, now) {
                debug!("Duplicate creation suppressed: {}", creation.path.display());
                continue;
            }
            deliver(&subscriber.callback, creation);
        }
    }
}

/// Run the callback, keeping the thread alive if it panics
fn deliver(callback: &Callback, event: CreationEvent) {
    let path = event.path.clone();
    if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(|| callback(event))) {
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown panic".to_string());
        error!("Callback panicked for {}: {message}", path.display());
    }
}
