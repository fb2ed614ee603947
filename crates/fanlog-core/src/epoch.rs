//! Per-reload sink settings.
//!
//! An [`Epoch`] is derived from a [`LogSettings`] snapshot and replaced
//! wholesale on every reload. Only the pipeline thread ever holds one.

use crate::config::LogSettings;
use crate::types::Level;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Epoch {
    pub file_level: Level,
    pub print_level: Level,
    pub print_enabled: bool,
    /// Requested by settings. The pipeline may still refuse it when the path
    /// is not writable.
    pub file_enabled: bool,
    pub show_milliseconds: bool,
    pub file_path: Option<PathBuf>,
    pub remote_enabled: bool,
}

impl Epoch {
    pub fn from_settings(settings: &LogSettings) -> Self {
        let file_level = Level::parse(&settings.file_lvl);
        let print_level = Level::parse(&settings.print_lvl);
        let file_path = settings.file_path();

        Self {
            file_level: file_level.unwrap_or(Level::Crit),
            print_level: print_level.unwrap_or(Level::Crit),
            print_enabled: matches!(settings.method, 2 | 3) && print_level.is_some(),
            file_enabled: matches!(settings.method, 1 | 3)
                && file_level.is_some()
                && file_path.is_some(),
            show_milliseconds: settings.print_ms,
            file_path,
            remote_enabled: settings.remote_log,
        }
    }

    pub fn prints(&self, level: Level) -> bool {
        self.print_enabled && level >= self.print_level
    }

    pub fn files(&self, level: Level) -> bool {
        self.file_enabled && level >= self.file_level
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
