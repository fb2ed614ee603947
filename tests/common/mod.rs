#![allow(dead_code)]
//! Shared test utilities for fanlog integration harnesses.
//!
//! Import everything you need via `mod common; use common::*;` at the top of
//! each harness file. Every helper is synchronous; harnesses observe the
//! sinks after `Logger::join`, which drains the queue up to the stop.

pub mod builders;
pub mod capture;
pub mod fake_remote;

pub use builders::*;
pub use capture::*;
pub use fake_remote::*;
