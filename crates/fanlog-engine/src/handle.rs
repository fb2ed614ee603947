//! Producer handles.
//!
//! A [`LogHandle`] is bound to a name path and a queue sender. Emitting
//! stamps the record with the current time and enqueues it; nothing else
//! happens on the caller's thread. Callers format their message before
//! emitting (`log.info(format!(...))`).

use crate::event::Event;
use fanlog_core::{Level, LogRecord};
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;

#[derive(Clone)]
pub struct LogHandle {
    name_path: Arc<[String]>,
    tx: UnboundedSender<Event>,
}

impl LogHandle {
    pub(crate) fn new(name_path: Arc<[String]>, tx: UnboundedSender<Event>) -> Self {
        Self { name_path, tx }
    }

    pub fn name_path(&self) -> &[String] {
        &self.name_path
    }

    /// A handle one level deeper. Does not touch the queue.
    pub fn child(&self, name: impl Into<String>) -> LogHandle {
        Self::new(self.extended(name), self.tx.clone())
    }

    /// Enqueue one record. Never blocks and never fails: once the pipeline
    /// has stopped, records are silently dropped.
    pub fn emit(&self, message: impl Into<String>, level: Level) {
        let record = LogRecord::new(Arc::clone(&self.name_path), message, level);
        let _ = self.tx.send(Event::Record(record));
    }

    /// Emit once under `name` without keeping a child handle around.
    pub fn module(&self, name: impl Into<String>, message: impl Into<String>, level: Level) {
        let record = LogRecord::new(self.extended(name), message, level);
        let _ = self.tx.send(Event::Record(record));
    }

    pub fn debug(&self, message: impl Into<String>) {
        self.emit(message, Level::Debug);
    }

    pub fn info(&self, message: impl Into<String>) {
        self.emit(message, Level::Info);
    }

    pub fn warn(&self, message: impl Into<String>) {
        self.emit(message, Level::Warn);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.emit(message, Level::Error);
    }

    pub fn crit(&self, message: impl Into<String>) {
        self.emit(message, Level::Crit);
    }

    fn extended(&self, name: impl Into<String>) -> Arc<[String]> {
        self.name_path
            .iter()
            .cloned()
            .chain(std::iter::once(name.into()))
            .collect()
    }
}

impl std::fmt::Debug for LogHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogHandle")
            .field("name_path", &self.name_path)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
