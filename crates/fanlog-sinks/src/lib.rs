//! fanlog-sinks — the three destinations of the fanlog pipeline.
//!
//! Each sink is owned by the pipeline thread and written to sequentially, so
//! none of them synchronizes internally.
//!
//! - [`ConsoleSink`]: colored lines on standard output.
//! - [`RotatingFile`]: size-bounded file with zlib-compressed backups.
//! - [`RemoteSession`]: a live tail over a socket handed off by another
//!   subsystem.

pub mod console;
pub mod error;
pub mod remote;
pub mod rotating;

pub use console::ConsoleSink;
pub use error::SinkError;
pub use remote::{RemoteSession, RemoteStream};
pub use rotating::RotatingFile;
