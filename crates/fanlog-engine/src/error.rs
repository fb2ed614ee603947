//! Error type for fanlog-engine.

use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to spawn the log pipeline thread: {0}")]
    Spawn(#[source] std::io::Error),

    /// The pipeline did not finish within the join timeout. The thread is
    /// left detached.
    #[error("log pipeline did not stop within {0:?}")]
    ShutdownTimeout(Duration),

    #[error("log pipeline thread panicked")]
    ConsumerPanicked,
}
