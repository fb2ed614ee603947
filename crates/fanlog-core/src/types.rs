//! Core types for fanlog-core.
//!
//! This module defines the record that travels through the ingress queue,
//! [`LogRecord`], and the closed set of severities, [`Level`].

use crate::error::CoreError;
use std::sync::Arc;

/// Log severity. Ordering follows rank: `Debug < Info < Warn < Error < Crit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    Debug,
    Info,
    Warn,
    Error,
    Crit,
}

impl Level {
    pub const ALL: [Level; 5] = [
        Level::Debug,
        Level::Info,
        Level::Warn,
        Level::Error,
        Level::Crit,
    ];

    /// Parse a severity name as it appears in the `[log]` settings.
    ///
    /// Accepts `debug`, `info`, `warning`, `warn`, `error`, `critical` and
    /// `crit`, matched exactly. Anything else (including `DEBUG`) yields
    /// `None`, which the epoch treats as "sink disabled".
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "debug" => Some(Level::Debug),
            "info" => Some(Level::Info),
            "warning" | "warn" => Some(Level::Warn),
            "error" => Some(Level::Error),
            "critical" | "crit" => Some(Level::Crit),
            _ => None,
        }
    }

    /// Numeric rank, spaced like syslog-era logging packages (10..=50).
    pub const fn rank(self) -> u8 {
        match self {
            Level::Debug => 10,
            Level::Info => 20,
            Level::Warn => 30,
            Level::Error => 40,
            Level::Crit => 50,
        }
    }

    /// Name padded to five characters, used by the raw and json forms.
    pub const fn padded(self) -> &'static str {
        match self {
            Level::Debug => "DEBUG",
            Level::Info => "INFO ",
            Level::Warn => "WARN ",
            Level::Error => "ERROR",
            Level::Crit => "CRIT ",
        }
    }

    /// Long name written into the rotating file.
    pub const fn file_name(self) -> &'static str {
        match self {
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warn => "WARNING",
            Level::Error => "ERROR",
            Level::Crit => "CRITICAL",
        }
    }

    /// ANSI SGR color code for messages at this level.
    pub const fn color(self) -> u8 {
        match self {
            Level::Debug => 90,
            Level::Info => 92,
            Level::Warn => 93,
            Level::Error => 91,
            Level::Crit => 95,
        }
    }
}

impl TryFrom<u8> for Level {
    type Error = CoreError;

    fn try_from(rank: u8) -> Result<Self, CoreError> {
        Level::ALL
            .into_iter()
            .find(|level| level.rank() == rank)
            .ok_or(CoreError::UnknownLevel(rank))
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.padded().trim_end())
    }
}

/// One emitted log line, created by a producer and consumed once by the
/// pipeline thread.
#[derive(Debug, Clone, PartialEq)]
pub struct LogRecord {
    /// Wall-clock time of the `emit` call, not of dispatch.
    pub ts: chrono::DateTime<chrono::Utc>,
    /// Caller hierarchy, root first. Shared with the handle that emitted it.
    pub name_path: Arc<[String]>,
    /// Pre-rendered message text.
    pub message: String,
    pub level: Level,
}

impl LogRecord {
    /// Build a record stamped with the current time.
    pub fn new(name_path: Arc<[String]>, message: impl Into<String>, level: Level) -> Self {
        Self {
            ts: chrono::Utc::now(),
            name_path,
            message: message.into(),
            level,
        }
    }

    /// Timestamp as fractional seconds since the Unix epoch.
    pub fn unix_seconds(&self) -> f64 {
        self.ts.timestamp_micros() as f64 / 1_000_000.0
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
