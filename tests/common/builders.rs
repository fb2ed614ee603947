//! Test builders — ergonomic constructors for `LogSettings`, records and
//! running loggers.
//!
//! These builders are designed for readability in test assertions, not for
//! production use. They panic on invalid input rather than returning `Result`.

use fanlog::{Level, LogRecord, LogSettings, Logger, OfferSlot, SettingsSource};
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use super::capture::CapturedConsole;

// ---------------------------------------------------------------------------
// SettingsBuilder
// ---------------------------------------------------------------------------

/// Fluent builder for `[log]` settings.
///
/// # Example
///
/// ```rust
/// let settings = SettingsBuilder::new()
///     .print_lvl("warn")
///     .file(dir.path().join("app.log"))
///     .build();
/// ```
pub struct SettingsBuilder {
    inner: LogSettings,
}

impl SettingsBuilder {
    /// Console only, everything printed, remote tail enabled.
    pub fn new() -> Self {
        Self {
            inner: LogSettings {
                method: 2,
                ..LogSettings::defaults()
            },
        }
    }

    pub fn print_lvl(mut self, level: &str) -> Self {
        self.inner.print_lvl = level.to_string();
        self
    }

    pub fn file_lvl(mut self, level: &str) -> Self {
        self.inner.file_lvl = level.to_string();
        self
    }

    /// Enable the file sink at `path` (method 3).
    pub fn file(mut self, path: impl AsRef<Path>) -> Self {
        self.inner = self.inner.with_file(path.as_ref());
        self.inner.method = 3;
        self
    }

    pub fn method(mut self, method: i64) -> Self {
        self.inner.method = method;
        self
    }

    pub fn remote(mut self, on: bool) -> Self {
        self.inner.remote_log = on;
        self
    }

    pub fn print_ms(mut self, on: bool) -> Self {
        self.inner.print_ms = on;
        self
    }

    pub fn build(self) -> LogSettings {
        self.inner
    }
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

pub fn record(names: &[&str], message: &str, level: Level) -> LogRecord {
    let path: Arc<[String]> = names.iter().map(|s| s.to_string()).collect();
    LogRecord::new(path, message, level)
}

// ---------------------------------------------------------------------------
// Running loggers
// ---------------------------------------------------------------------------

/// A logger writing its console to a capture buffer and listening on a
/// fresh offer slot.
pub struct Harness {
    pub logger: Logger,
    pub console: CapturedConsole,
    pub offers: OfferSlot,
}

pub fn start(settings: impl SettingsSource) -> Harness {
    let console = CapturedConsole::default();
    let offers = OfferSlot::new();
    let logger = Logger::builder(settings)
        .console(console.clone())
        .offers(Arc::new(offers.clone()))
        .spawn()
        .expect("logger must spawn");
    Harness {
        logger,
        console,
        offers,
    }
}

impl Harness {
    /// Stop the logger and wait for the pipeline to drain.
    pub fn finish(self) -> CapturedConsole {
        self.logger
            .join(Duration::from_secs(10))
            .expect("logger must stop in time");
        self.console
    }
}

/// Poll `cond` until it holds or five seconds pass.
pub fn wait_until(mut cond: impl FnMut() -> bool) {
    let deadline = Instant::now() + Duration::from_secs(5);
    while !cond() {
        assert!(Instant::now() < deadline, "condition not met within 5s");
        std::thread::sleep(Duration::from_millis(2));
    }
}
