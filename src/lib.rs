//! fanlog — multi-sink log fan-out with a live remote tail.
//!
//! This crate re-exports the three workspace layers so that integration
//! tests, benches and embedding processes can depend on one crate.
//!
//! # Architecture
//!
//! ```text
//! LogHandle ──► queue ──► Pipeline ──┬──► console   (colored, print_lvl)
//!                  ▲                 ├──► file      (rotating, file_lvl)
//!   RemoteOffer ───┘ Connect         └──► remote    (raw | json | colored, every level)
//! ```
//!
//! One background thread owns every sink. Producers only enqueue.

pub use fanlog_engine as engine;
pub use fanlog_sinks as sinks;

pub use fanlog_core::{
    Epoch, FileSettings, Level, LogRecord, LogSettings, RemoteMode, Renderer, SettingsSource,
    SharedSettings,
};
pub use fanlog_engine::{
    EngineError, LogHandle, Logger, LoggerBuilder, OfferChannel, OfferSlot, RemoteOffer,
    DEFAULT_JOIN_TIMEOUT,
};
pub use fanlog_sinks::{RemoteSession, RemoteStream, RotatingFile};
