//! The pipeline thread.
//!
//! [`Pipeline::run`] is the only code that touches the epoch, the sinks and
//! the remote session, so none of them is locked. It blocks on the ingress
//! queue and handles one event at a time, which gives every sink the same
//! global enqueue order.

use crate::event::{ControlEvent, Event};
use crate::handoff::{OfferChannel, OfferHandler, RemoteOffer};
use fanlog_core::{Epoch, Level, LogRecord, RemoteMode, Renderer, SettingsSource};
use fanlog_sinks::{ConsoleSink, RemoteSession, RemoteStream, RotatingFile};
use std::sync::Arc;
use tokio::sync::mpsc::{UnboundedReceiver, WeakUnboundedSender};

/// Name path of the engine's own housekeeping lines.
pub(crate) const SELF_NAME: &str = "Logger";

pub(crate) struct Pipeline {
    rx: UnboundedReceiver<Event>,
    /// Weak so that a forgotten subscription cannot keep the queue open.
    tx: WeakUnboundedSender<Event>,
    settings: Arc<dyn SettingsSource>,
    offers: Option<Arc<dyn OfferChannel>>,
    subscribed: bool,
    epoch: Epoch,
    renderer: Renderer,
    console: ConsoleSink,
    file: Option<RotatingFile>,
    remote: Option<RemoteSession>,
    self_path: Arc<[String]>,
}

impl Pipeline {
    pub(crate) fn new(
        rx: UnboundedReceiver<Event>,
        tx: WeakUnboundedSender<Event>,
        settings: Arc<dyn SettingsSource>,
        offers: Option<Arc<dyn OfferChannel>>,
        console: ConsoleSink,
    ) -> Self {
        let epoch = Epoch::from_settings(&settings.log_settings());
        Self {
            rx,
            tx,
            settings,
            offers,
            subscribed: false,
            renderer: Renderer::new(epoch.show_milliseconds),
            epoch,
            console,
            file: None,
            remote: None,
            self_path: Arc::from(vec![SELF_NAME.to_string()]),
        }
    }

    pub(crate) fn run(mut self) {
        self.apply_epoch(self.epoch.clone());

        while let Some(event) = self.rx.blocking_recv() {
            match event {
                Event::Record(record) => self.dispatch(&record),
                Event::Control(ControlEvent::Reload) => self.reload(),
                Event::Control(ControlEvent::Connect { stream, mode_hint }) => {
                    self.connect(stream, &mode_hint)
                }
                Event::Control(ControlEvent::Stop) => break,
            }
        }

        self.close_remote();
        self.set_subscribed(false);
        self.file = None;
        tracing::debug!("log pipeline stopped");
    }

    // -----------------------------------------------------------------------
    // Control events
    // -----------------------------------------------------------------------

    fn reload(&mut self) {
        let epoch = Epoch::from_settings(&self.settings.log_settings());
        self.apply_epoch(epoch);
    }

    fn apply_epoch(&mut self, epoch: Epoch) {
        self.renderer.set_show_milliseconds(epoch.show_milliseconds);
        self.set_subscribed(epoch.remote_enabled);
        self.file = None;
        self.epoch = epoch;

        if !self.epoch.remote_enabled {
            self.close_remote();
        }

        if !self.epoch.file_enabled {
            return;
        }
        let Some(path) = self.epoch.file_path.clone() else {
            return;
        };
        match RotatingFile::open(&path) {
            Ok(file) => self.file = Some(file),
            Err(e) => {
                tracing::warn!(error = %e, "file sink disabled for this epoch");
                self.local(
                    Level::Crit,
                    format!(
                        "Logging to {} is impossible - no write permission. Fix it",
                        path.display()
                    ),
                );
            }
        }
    }

    fn set_subscribed(&mut self, on: bool) {
        let Some(offers) = &self.offers else {
            return;
        };
        if on == self.subscribed {
            return;
        }
        if on {
            offers.subscribe(offer_handler(self.tx.clone()));
        } else {
            offers.unsubscribe();
        }
        self.subscribed = on;
    }

    fn connect(&mut self, stream: Box<dyn RemoteStream>, mode_hint: &str) {
        self.close_remote();
        let session = RemoteSession::attach(stream, mode_hint);
        let line = format!("OPEN REMOTE LOG FOR {}", session.peer());
        tracing::debug!(peer = session.peer(), mode = %session.mode(), "remote log attached");
        self.remote = Some(session);
        self.local(Level::Warn, line);
    }

    fn close_remote(&mut self) {
        if let Some(session) = self.remote.take() {
            let peer = session.close();
            self.local(Level::Warn, format!("CLOSE REMOTE LOG FOR {peer}"));
        }
    }

    // -----------------------------------------------------------------------
    // Records
    // -----------------------------------------------------------------------

    fn dispatch(&mut self, record: &LogRecord) {
        let mut console_line = None;
        if self.epoch.prints(record.level) {
            let line = self.renderer.colored(record);
            self.console.write_line(&line);
            console_line = Some(line);
        }

        if let Some(session) = self.remote.as_mut() {
            let line = match (session.mode(), console_line) {
                (RemoteMode::Colored, Some(line)) => line,
                (mode, _) => self.renderer.render(mode, record),
            };
            if let Err(e) = session.send(&line) {
                tracing::debug!(error = %e, "remote log session dropped");
                self.close_remote();
            }
        }

        self.write_file(record);
    }

    /// Housekeeping line for the console and file only.
    fn local(&mut self, level: Level, message: String) {
        let record = LogRecord::new(Arc::clone(&self.self_path), message, level);
        if self.epoch.prints(level) {
            let line = self.renderer.colored(&record);
            self.console.write_line(&line);
        }
        self.write_file(&record);
    }

    fn write_file(&mut self, record: &LogRecord) {
        if !self.epoch.files(record.level) {
            return;
        }
        let Some(file) = self.file.as_mut() else {
            return;
        };
        let body = self.renderer.file_body(record);
        if let Err(e) = file.write_line(record.level, &body) {
            tracing::warn!(error = %e, "log line not written, retrying on the next record");
        }
    }
}

fn offer_handler(tx: WeakUnboundedSender<Event>) -> OfferHandler {
    Arc::new(move |mut offer: RemoteOffer| {
        let mode_hint = offer.mode().to_string();
        let Some(stream) = offer.extract() else {
            return;
        };
        match tx.upgrade() {
            Some(tx) => {
                let _ = tx.send(Event::Control(ControlEvent::Connect { stream, mode_hint }));
            }
            None => tracing::debug!("remote log offer arrived after shutdown"),
        }
    })
}
