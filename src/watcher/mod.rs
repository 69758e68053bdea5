//! Directory watch engine
//!
//! Reports each newly created direct child of the registered roots:
//! - One notification thread per engine, owning the `notify` watcher
//! - Direct-child filtering for every backend
//! - Short-window duplicate suppression per root
//! - Panicking callbacks are logged and do not stop delivery

mod backend;
mod engine;
mod event;
mod normalizer;

pub use backend::{Backend, DEFAULT_POLL_INTERVAL_MS};
pub use engine::{Callback, EngineState, StartReport, WatchEngine, WatchRoot, SHUTDOWN_TIMEOUT, THREAD_NAME};
pub use event::{CreationEvent, ItemType, RawEvent, RawPath};
pub use normalizer::{DirectChildFilter, EventNormalizer, DUPLICATE_WINDOW_MS};
