//! `[log]` settings for fanlog.
//!
//! [`LogSettings::load`] reads a TOML file layered on top of the embedded
//! defaults. [`LogSettings::defaults`] returns the same defaults without
//! touching the filesystem (useful in tests).
//!
//! The pipeline never holds settings directly. It asks a [`SettingsSource`]
//! for a fresh snapshot at start-up and on every reload, and derives an
//! [`Epoch`](crate::Epoch) from it.

use crate::error::CoreError;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, RwLock};

// ---------------------------------------------------------------------------
// Embedded defaults
// ---------------------------------------------------------------------------

const DEFAULT_CONFIG: &str = r#"
[log]
file_lvl   = "debug"
print_lvl  = "debug"
remote_log = true
print_ms   = true
method     = 3
file       = ""
"#;

// ---------------------------------------------------------------------------
// Public settings types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
struct Document {
    #[serde(default)]
    log: LogSettings,
}

/// `[log]` section of the settings file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LogSettings {
    /// Minimum severity name for the file sink.
    #[serde(default = "default_level")]
    pub file_lvl: String,
    /// Minimum severity name for the console sink.
    #[serde(default = "default_level")]
    pub print_lvl: String,
    /// Whether the engine listens for remote tail offers.
    #[serde(default = "default_true")]
    pub remote_log: bool,
    /// Append `.mmm` to console and remote timestamps.
    #[serde(default = "default_true")]
    pub print_ms: bool,
    /// 1 = file only, 2 = console only, 3 = both. Other values enable neither.
    #[serde(default = "default_method")]
    pub method: i64,
    /// Log file path. Empty disables the file sink.
    #[serde(default)]
    pub file: String,
}

fn default_level() -> String {
    "debug".to_string()
}

fn default_true() -> bool {
    true
}

fn default_method() -> i64 {
    3
}

impl Default for LogSettings {
    fn default() -> Self {
        Self::defaults()
    }
}

impl LogSettings {
    /// Load `path`, layered on top of the built-in defaults. A missing file
    /// yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CoreError> {
        let doc: Document = config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .add_source(config::File::from(path.as_ref()).required(false))
            .build()?
            .try_deserialize()?;
        Ok(doc.log)
    }

    /// Parse settings from a TOML string, layered on top of the defaults.
    pub fn from_toml_str(src: &str) -> Result<Self, CoreError> {
        let doc: Document = config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .add_source(config::File::from_str(src, config::FileFormat::Toml))
            .build()?
            .try_deserialize()?;
        Ok(doc.log)
    }

    /// Return the built-in defaults without touching the filesystem.
    pub fn defaults() -> Self {
        Self {
            file_lvl: default_level(),
            print_lvl: default_level(),
            remote_log: default_true(),
            print_ms: default_true(),
            method: default_method(),
            file: String::new(),
        }
    }

    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.file = path.into().to_string_lossy().into_owned();
        self
    }

    pub fn file_path(&self) -> Option<PathBuf> {
        (!self.file.is_empty()).then(|| PathBuf::from(&self.file))
    }
}

// ---------------------------------------------------------------------------
// Sources
// ---------------------------------------------------------------------------

/// Anything that can hand the pipeline the latest `[log]` snapshot.
pub trait SettingsSource: Send + Sync + 'static {
    fn log_settings(&self) -> LogSettings;
}

impl SettingsSource for LogSettings {
    fn log_settings(&self) -> LogSettings {
        self.clone()
    }
}

/// Settings owned by the embedding process and swapped at runtime; call
/// `Logger::reload` after [`SharedSettings::replace`] for them to apply.
#[derive(Debug, Clone, Default)]
pub struct SharedSettings {
    inner: Arc<RwLock<LogSettings>>,
}

impl SharedSettings {
    pub fn new(settings: LogSettings) -> Self {
        Self {
            inner: Arc::new(RwLock::new(settings)),
        }
    }

    pub fn replace(&self, settings: LogSettings) {
        *self.inner.write().unwrap_or_else(|e| e.into_inner()) = settings;
    }

    pub fn update(&self, f: impl FnOnce(&mut LogSettings)) {
        f(&mut self.inner.write().unwrap_or_else(|e| e.into_inner()));
    }
}

impl SettingsSource for SharedSettings {
    fn log_settings(&self) -> LogSettings {
        self.inner.read().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

/// Re-reads a TOML file on every snapshot. A file that fails to parse keeps
/// the previous snapshot in force.
#[derive(Debug)]
pub struct FileSettings {
    path: PathBuf,
    last: Mutex<LogSettings>,
}

impl FileSettings {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            last: Mutex::new(LogSettings::defaults()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SettingsSource for FileSettings {
    fn log_settings(&self) -> LogSettings {
        let mut last = self.last.lock().unwrap_or_else(|e| e.into_inner());
        match LogSettings::load(&self.path) {
            Ok(fresh) => *last = fresh,
            Err(e) => tracing::warn!(
                path = %self.path.display(),
                error = %e,
                "log settings unreadable, keeping previous snapshot"
            ),
        }
        last.clone()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
