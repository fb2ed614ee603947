//! Error type for fanlog-core.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    /// A numeric rank that maps to none of the five severities. Reaching this
    /// means a producer was wired with a bogus level.
    #[error("incorrect log level: {0}")]
    UnknownLevel(u8),

    #[error("unknown remote log mode: {0:?}")]
    UnknownMode(String),

    #[error("invalid log settings: {0}")]
    Settings(#[from] config::ConfigError),
}
