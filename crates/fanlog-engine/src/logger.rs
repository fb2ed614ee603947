//! The logging service object.
//!
//! Construct one [`Logger`] at start-up, hand [`LogHandle`]s to every
//! subsystem, and call [`Logger::join`] at shutdown. There is no global
//! instance.
//!
//! ```no_run
//! use fanlog_core::LogSettings;
//! use fanlog_engine::Logger;
//! use std::time::Duration;
//!
//! let logger = Logger::builder(LogSettings::defaults()).spawn()?;
//! let log = logger.handle("Main");
//! log.info("ready");
//! log.child("Net").warn(format!("retry in {}s", 5));
//! logger.join(Duration::from_secs(30))?;
//! # Ok::<(), fanlog_engine::EngineError>(())
//! ```

use crate::error::EngineError;
use crate::event::{ControlEvent, Event};
use crate::handle::LogHandle;
use crate::handoff::OfferChannel;
use crate::pipeline::{Pipeline, SELF_NAME};
use fanlog_core::SettingsSource;
use fanlog_sinks::ConsoleSink;
use std::io::Write;
use std::sync::mpsc::{self as std_mpsc, RecvTimeoutError};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedSender};

pub const DEFAULT_JOIN_TIMEOUT: Duration = Duration::from_secs(30);

const THREAD_NAME: &str = "Logger";

pub struct LoggerBuilder {
    settings: Arc<dyn SettingsSource>,
    offers: Option<Arc<dyn OfferChannel>>,
    console: Option<ConsoleSink>,
}

impl LoggerBuilder {
    pub fn new(settings: impl SettingsSource) -> Self {
        Self {
            settings: Arc::new(settings),
            offers: None,
            console: None,
        }
    }

    /// Subscribe to remote tail offers on `channel` while `remote_log` is on.
    pub fn offers(mut self, channel: Arc<dyn OfferChannel>) -> Self {
        self.offers = Some(channel);
        self
    }

    /// Send console lines to `out` instead of standard output.
    pub fn console(mut self, out: impl Write + Send + 'static) -> Self {
        self.console = Some(ConsoleSink::new(out));
        self
    }

    /// Start the pipeline thread.
    pub fn spawn(self) -> Result<Logger, EngineError> {
        let (tx, rx) = mpsc::unbounded_channel();
        let (done_tx, done_rx) = std_mpsc::channel();
        let pipeline = Pipeline::new(
            rx,
            tx.downgrade(),
            self.settings,
            self.offers,
            self.console.unwrap_or_default(),
        );

        let thread = std::thread::Builder::new()
            .name(THREAD_NAME.to_string())
            .spawn(move || {
                pipeline.run();
                let _ = done_tx.send(());
            })
            .map_err(EngineError::Spawn)?;

        let logger = Logger {
            log: LogHandle::new(Arc::from(vec![SELF_NAME.to_string()]), tx.clone()),
            tx,
            worker: Some(Worker {
                thread,
                done: done_rx,
            }),
        };
        logger.log.info("start");
        Ok(logger)
    }
}

struct Worker {
    thread: JoinHandle<()>,
    done: std_mpsc::Receiver<()>,
}

pub struct Logger {
    tx: UnboundedSender<Event>,
    log: LogHandle,
    worker: Option<Worker>,
}

impl Logger {
    pub fn builder(settings: impl SettingsSource) -> LoggerBuilder {
        LoggerBuilder::new(settings)
    }

    /// Root handle for a subsystem.
    pub fn handle(&self, name: impl Into<String>) -> LogHandle {
        LogHandle::new(Arc::from(vec![name.into()]), self.tx.clone())
    }

    /// Ask the pipeline to re-read settings. Applied in queue order.
    pub fn reload(&self) {
        let _ = self.tx.send(Event::Control(ControlEvent::Reload));
    }

    /// Enqueue a stop and wait up to `timeout` for the pipeline to finish.
    ///
    /// Records enqueued after the stop by other threads are dropped. On
    /// timeout the thread is left detached and
    /// [`EngineError::ShutdownTimeout`] is returned.
    pub fn join(mut self, timeout: Duration) -> Result<(), EngineError> {
        let Some(worker) = self.worker.take() else {
            return Ok(());
        };
        self.log.info("stop.");
        let _ = self.tx.send(Event::Control(ControlEvent::Stop));

        match worker.done.recv_timeout(timeout) {
            Ok(()) | Err(RecvTimeoutError::Disconnected) => worker
                .thread
                .join()
                .map_err(|_| EngineError::ConsumerPanicked),
            Err(RecvTimeoutError::Timeout) => Err(EngineError::ShutdownTimeout(timeout)),
        }
    }
}

impl Drop for Logger {
    /// A logger dropped without `join` still stops its pipeline, but does not
    /// wait for it.
    fn drop(&mut self) {
        if self.worker.is_some() {
            let _ = self.tx.send(Event::Control(ControlEvent::Stop));
        }
    }
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger")
            .field("running", &self.worker.is_some())
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
