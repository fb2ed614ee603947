//! Size-bounded log file with compressed backups.
//!
//! Before a line is appended, the handler checks whether it would push the
//! active file to the size limit. If so the file is closed, existing backups
//! shift up by one (`<file>.1.gz` → `<file>.2.gz`, the oldest is dropped), and
//! the closed file is deflated into `<file>.1.gz`. The uncompressed original
//! is removed only once compression has succeeded.
//!
//! Backups hold a zlib stream. The `.gz` suffix is nominal: read them back
//! with a zlib decoder, not `gunzip`.
//!
//! Every line carries its own write-time stamp:
//!
//! ```text
//! 2024-01-15 10:00:00,123 WARNING Main->Net: connection lost
//! ```

use crate::error::SinkError;
use fanlog_core::Level;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

pub const DEFAULT_MAX_BYTES: u64 = 1024 * 1024;
pub const DEFAULT_BACKUPS: usize = 2;
pub const COMPRESSED_SUFFIX: &str = ".gz";

#[derive(Debug)]
pub struct RotatingFile {
    path: PathBuf,
    max_bytes: u64,
    backups: usize,
    file: Option<File>,
    size: u64,
}

impl RotatingFile {
    /// Open (or create) `path` for appending with the default limits. Fails
    /// when the path is not writable, which doubles as the writability check.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, SinkError> {
        Self::with_limits(path, DEFAULT_MAX_BYTES, DEFAULT_BACKUPS)
    }

    pub fn with_limits(
        path: impl Into<PathBuf>,
        max_bytes: u64,
        backups: usize,
    ) -> Result<Self, SinkError> {
        let mut this = Self {
            path: path.into(),
            max_bytes,
            backups,
            file: None,
            size: 0,
        };
        this.reopen()?;
        Ok(this)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Name of the `n`-th backup, counting from 1 (newest).
    pub fn backup_path(&self, n: usize) -> PathBuf {
        let mut name = self.path.clone().into_os_string();
        name.push(format!(".{n}{COMPRESSED_SUFFIX}"));
        PathBuf::from(name)
    }

    /// Append one formatted line, rotating first when it would reach the
    /// size limit. A failed rotation is logged and the line still goes to
    /// the current file.
    pub fn write_line(&mut self, level: Level, body: &str) -> Result<(), SinkError> {
        let line = format!(
            "{} {} {}\n",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S,%3f"),
            level.file_name(),
            body
        );

        if self.should_rollover(line.len() as u64) {
            if let Err(e) = self.rotate() {
                tracing::warn!(error = %e, "log rotation abandoned");
            }
        }

        if self.file.is_none() {
            self.reopen()?;
        }
        let file = self.file.as_mut().ok_or_else(|| SinkError::File {
            path: self.path.clone(),
            source: io::Error::new(io::ErrorKind::NotFound, "log file closed"),
        })?;
        if let Err(source) = file.write_all(line.as_bytes()).and_then(|()| file.flush()) {
            // Reopened on the next write.
            self.file = None;
            return Err(SinkError::File {
                path: self.path.clone(),
                source,
            });
        }
        self.size += line.len() as u64;
        Ok(())
    }

    fn should_rollover(&self, incoming: u64) -> bool {
        self.max_bytes > 0 && self.size > 0 && self.size + incoming >= self.max_bytes
    }

    /// Close the active file, shift backups and compress it into backup 1.
    pub fn rotate(&mut self) -> Result<(), SinkError> {
        self.file = None;
        let rotate_err = |path: &Path, source| SinkError::Rotate {
            path: path.to_path_buf(),
            source,
        };

        if self.backups == 0 {
            File::create(&self.path).map_err(|e| rotate_err(&self.path, e))?;
            self.size = 0;
            return self.reopen();
        }

        for n in (1..self.backups).rev() {
            let src = self.backup_path(n);
            let dst = self.backup_path(n + 1);
            if src.exists() {
                if dst.exists() {
                    fs::remove_file(&dst).map_err(|e| rotate_err(&dst, e))?;
                }
                fs::rename(&src, &dst).map_err(|e| rotate_err(&src, e))?;
            }
        }

        let newest = self.backup_path(1);
        if newest.exists() {
            fs::remove_file(&newest).map_err(|e| rotate_err(&newest, e))?;
        }
        compress(&self.path, &newest).map_err(|e| rotate_err(&self.path, e))?;
        fs::remove_file(&self.path).map_err(|e| rotate_err(&self.path, e))?;

        tracing::debug!(path = %self.path.display(), "log file rotated");
        self.size = 0;
        self.reopen()
    }

    /// Drop the file handle. The next write reopens it.
    pub fn close(&mut self) {
        self.file = None;
    }

    fn reopen(&mut self) -> Result<(), SinkError> {
        let file_err = |source| SinkError::File {
            path: self.path.clone(),
            source,
        };
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(file_err)?;
        self.size = file.metadata().map(|m| m.len()).unwrap_or(0);
        self.file = Some(file);
        Ok(())
    }
}

fn compress(src: &Path, dst: &Path) -> io::Result<()> {
    let data = fs::read(src)?;
    let mut encoder = ZlibEncoder::new(File::create(dst)?, Compression::best());
    encoder.write_all(&data)?;
    encoder.finish()?.sync_all()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
