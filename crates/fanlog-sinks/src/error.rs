//! Error type for fanlog-sinks.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("log file {path}: {source}")]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("rotating {path} failed: {source}")]
    Rotate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("remote log write to {peer} failed: {source}")]
    Remote {
        peer: String,
        #[source]
        source: std::io::Error,
    },
}
