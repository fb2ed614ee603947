//! fanlog-engine — the running half of fanlog.
//!
//! A [`Logger`] owns one background thread (the pipeline) that drains an
//! unbounded queue of records and control events in strict FIFO order and
//! fans each record out to the console, the rotating file and, when a viewer
//! is attached, a remote session. Producers hold cheap [`LogHandle`]s and
//! never block or fail.
//!
//! ```text
//! LogHandle ─┐
//! LogHandle ─┼──► unbounded queue ──► Pipeline thread ──► sinks
//! Logger ────┘   (Record | Reload | Connect | Stop)
//!                        ▲
//! OfferChannel ──────────┘ Connect (socket hand-off)
//! ```

pub mod error;
pub mod event;
pub mod handle;
pub mod handoff;
pub mod logger;
mod pipeline;

pub use error::EngineError;
pub use event::{ControlEvent, Event};
pub use handle::LogHandle;
pub use handoff::{OfferChannel, OfferHandler, OfferSlot, Released, RemoteOffer};
pub use logger::{Logger, LoggerBuilder, DEFAULT_JOIN_TIMEOUT};
