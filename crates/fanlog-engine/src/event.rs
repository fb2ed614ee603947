//! Items carried by the ingress queue.

use fanlog_core::LogRecord;
use fanlog_sinks::RemoteStream;

/// Everything the pipeline thread consumes, in enqueue order.
#[derive(Debug)]
pub enum Event {
    Record(LogRecord),
    Control(ControlEvent),
}

pub enum ControlEvent {
    /// Re-read settings and rebuild the epoch.
    Reload,
    /// Close any remote session and exit the pipeline loop.
    Stop,
    /// Take over a socket handed off by the network server.
    Connect {
        stream: Box<dyn RemoteStream>,
        mode_hint: String,
    },
}

impl std::fmt::Debug for ControlEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ControlEvent::Reload => f.write_str("Reload"),
            ControlEvent::Stop => f.write_str("Stop"),
            ControlEvent::Connect { stream, mode_hint } => f
                .debug_struct("Connect")
                .field("peer", &stream.peer())
                .field("mode_hint", mode_hint)
                .finish(),
        }
    }
}

impl From<LogRecord> for Event {
    fn from(record: LogRecord) -> Self {
        Event::Record(record)
    }
}

impl From<ControlEvent> for Event {
    fn from(control: ControlEvent) -> Self {
        Event::Control(control)
    }
}
