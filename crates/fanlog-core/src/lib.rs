//! fanlog-core — shared types for the fanlog pipeline.
//!
//! This crate holds everything the pipeline layers agree on: the
//! [`LogRecord`] that producers emit, its [`Level`], the `[log]` settings and
//! the per-reload [`Epoch`] derived from them, and the text/json render forms
//! used by every sink.
//!
//! # Architecture
//!
//! ```text
//! LogHandle ──► ingress queue ──► Pipeline ──┬──► console
//!                                           ├──► rotating file
//!                                           └──► remote session
//! ```
//!
//! The sinks live in `fanlog-sinks`; the queue, the consumer thread and the
//! producer handles live in `fanlog-engine`.

pub mod config;
pub mod epoch;
pub mod error;
pub mod render;
pub mod types;

pub use config::{FileSettings, LogSettings, SettingsSource, SharedSettings};
pub use epoch::Epoch;
pub use error::CoreError;
pub use render::{RemoteMode, Renderer};
pub use types::{Level, LogRecord};
