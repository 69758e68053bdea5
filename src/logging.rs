//! Logging setup
//!
//! Every line reads `[YYYY-MM-DD HH:MM:SS] [pid] LEVEL: message`, on stderr
//! and in a daily rolling file under the state directory.

use std::fmt;
use std::path::PathBuf;

use is_terminal::IsTerminal;
use tracing::{Event, Level, Subscriber};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use crate::error::{HousekeeperError, HousekeeperResult};

/// Overrides the `-v` derived filter, in `EnvFilter` syntax
pub const LOG_ENV_VAR: &str = "HOUSEKEEPER_LOG";

const LOG_FILE_PREFIX: &str = "housekeeper.log";
const MAX_LOG_FILES: usize = 3;
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Where log lines go
#[derive(Debug, Clone, Default)]
pub struct LogOptions {
    /// Number of `-v` flags
    pub verbosity: u8,
    /// Write to stderr
    pub console: bool,
    /// Directory for the rolling log file
    pub file_dir: Option<PathBuf>,
}

impl LogOptions {
    /// Console plus file, for foreground commands
    pub fn interactive(verbosity: u8, file_dir: Option<PathBuf>) -> Self {
        Self {
            verbosity,
            console: true,
            file_dir,
        }
    }

    /// File only; a detached daemon has no terminal
    pub fn daemon(verbosity: u8, file_dir: PathBuf) -> Self {
        Self {
            verbosity,
            console: false,
            file_dir: Some(file_dir),
        }
    }

    fn default_directive(&self) -> String {
        let level = match self.verbosity {
            0 => Level::INFO,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        };
        format!("warn,housekeeper={}", level.to_string().to_lowercase())
    }
}

/// Keeps the background log writer alive; flushes on drop
#[must_use = "dropping the guard stops file logging"]
pub struct LogGuard {
    _file: Option<WorkerGuard>,
}

/// Install the global subscriber
pub fn init(options: LogOptions) -> HousekeeperResult<LogGuard> {
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
        .unwrap_or_else(|_| EnvFilter::new(options.default_directive()));

    let console = options.console.then(|| {
        tracing_subscriber::fmt::layer()
            .event_format(LineFormat::new(std::io::stderr().is_terminal()))
            .with_writer(std::io::stderr)
            .boxed()
    });

    let (file, guard) = match &options.file_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)?;
            let appender = RollingFileAppender::builder()
                .rotation(Rotation::DAILY)
                .filename_prefix(LOG_FILE_PREFIX)
                .max_log_files(MAX_LOG_FILES)
                .build(dir)
                .map_err(|e| HousekeeperError::SubsystemInit {
                    target: "log file".to_string(),
                    reason: e.to_string(),
                })?;
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .event_format(LineFormat::new(false))
                .with_writer(writer)
                .with_ansi(false)
                .boxed();
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(file)
        .try_init()
        .map_err(|e| HousekeeperError::SubsystemInit {
            target: "logging".to_string(),
            reason: e.to_string(),
        })?;

    Ok(LogGuard { _file: guard })
}

/// `[timestamp] [pid] LEVEL: message`
#[derive(Debug, Clone)]
pub struct LineFormat {
    pid: u32,
    ansi: bool,
}

impl LineFormat {
    pub fn new(ansi: bool) -> Self {
        Self {
            pid: std::process::id(),
            ansi,
        }
    }
}

fn level_color(level: &Level) -> &'static str {
    match *level {
        Level::ERROR => "\x1b[31m",
        Level::WARN => "\x1b[33m",
        Level::INFO => "\x1b[32m",
        _ => "\x1b[2m",
    }
}

impl<S, N> FormatEvent<S, N> for LineFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let now = chrono::Local::now().format(TIMESTAMP_FORMAT);
        let level = event.metadata().level();

        write!(writer, "[{now}] [{}] ", self.pid)?;
        if self.ansi {
            write!(writer, "{}{level}\x1b[0m: ", level_color(level))?;
        } else {
            write!(writer, "{level}: ")?;
        }
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Buffer(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Buffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn capture(ansi: bool, f: impl FnOnce()) -> String {
        let buffer = Buffer::default();
        let sink = buffer.clone();
        let subscriber = tracing_subscriber::fmt()
            .event_format(LineFormat::new(ansi))
            .with_writer(move || sink.clone())
            .with_max_level(Level::TRACE)
            .finish();

        tracing::subscriber::with_default(subscriber, f);
        let bytes = buffer.0.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn test_line_format() {
        let out = capture(false, || tracing::info!("Watching: {}", "/home/me"));
        let line = out.trim_end();

        // [2025-01-01 12:00:00] [1234] INFO: Watching: /home/me
        assert!(line.starts_with('['));
        assert_eq!(&line[20..22], "] ");
        let pid = format!("[{}] ", std::process::id());
        assert_eq!(&line[22..22 + pid.len()], pid);
        assert!(line.ends_with("INFO: Watching: /home/me"));
        assert!(!line.contains('\x1b'));
    }

    #[test]
    fn test_line_format_levels() {
        let out = capture(false, || {
            tracing::warn!("Skipping non-directory: /x");
            tracing::error!("No directories to watch");
        });
        let lines: Vec<&str> = out.lines().collect();
        assert!(lines[0].ends_with("WARN: Skipping non-directory: /x"));
        assert!(lines[1].ends_with("ERROR: No directories to watch"));
    }

    #[test]
    fn test_line_format_ansi_colors_level() {
        let out = capture(true, || tracing::error!("boom"));
        assert!(out.contains("\x1b[31mERROR\x1b[0m: boom"));
    }

    #[test]
    fn test_default_directive_follows_verbosity() {
        assert_eq!(LogOptions::default().default_directive(), "warn,housekeeper=info");
        assert_eq!(
            LogOptions::interactive(1, None).default_directive(),
            "warn,housekeeper=debug"
        );
        assert_eq!(
            LogOptions::daemon(5, PathBuf::from("/tmp")).default_directive(),
            "warn,housekeeper=trace"
        );
    }
}
