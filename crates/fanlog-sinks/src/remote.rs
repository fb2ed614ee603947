//! Remote tail session over a socket handed off by another subsystem.
//!
//! Once a [`RemoteSession`] is built, the pipeline thread is the only owner
//! of the socket: read/write deadlines are cleared so the tail lasts until
//! the viewer disconnects, a write fails, or a newer viewer replaces it.
//! Every record is one `\n`-terminated write. Teardown writes exactly one
//! sign-off line in the session's mode before the socket is shut down.

use crate::error::SinkError;
use fanlog_core::render::{colored, json_line};
use fanlog_core::{Level, RemoteMode};
use std::io::{self, Write};
use std::net::{Shutdown, TcpStream};

pub const SIGN_OFF: &str = "CLOSE REMOTE LOG, BYE.";
/// Caller name stamped on the json sign-off.
pub const SIGN_OFF_CALLER: &str = "Logger";
/// `lvl` field of the json sign-off.
pub const SIGN_OFF_LEVEL: &str = "REMOTE";

/// A connected byte stream the engine can take ownership of.
pub trait RemoteStream: Write + Send {
    /// Printable identity of the viewer, e.g. `10.0.0.7:51234`.
    fn peer(&self) -> String;

    /// Remove any read/write timeout left by the previous owner.
    fn clear_deadlines(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn shutdown(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl RemoteStream for TcpStream {
    fn peer(&self) -> String {
        self.peer_addr()
            .map(|addr| addr.to_string())
            .unwrap_or_else(|_| "unknown".to_string())
    }

    fn clear_deadlines(&mut self) -> io::Result<()> {
        self.set_read_timeout(None)?;
        self.set_write_timeout(None)
    }

    fn shutdown(&mut self) -> io::Result<()> {
        TcpStream::shutdown(self, Shutdown::Both)
    }
}

#[cfg(unix)]
impl RemoteStream for std::os::unix::net::UnixStream {
    fn peer(&self) -> String {
        self.peer_addr()
            .ok()
            .and_then(|addr| addr.as_pathname().map(|p| p.display().to_string()))
            .unwrap_or_else(|| "unix".to_string())
    }

    fn clear_deadlines(&mut self) -> io::Result<()> {
        self.set_read_timeout(None)?;
        self.set_write_timeout(None)
    }

    fn shutdown(&mut self) -> io::Result<()> {
        std::os::unix::net::UnixStream::shutdown(self, Shutdown::Both)
    }
}

pub struct RemoteSession {
    stream: Box<dyn RemoteStream>,
    mode: RemoteMode,
    peer: String,
}

impl RemoteSession {
    /// Take ownership of `stream`. Unknown mode hints fall back to
    /// [`RemoteMode::Colored`].
    pub fn attach(mut stream: Box<dyn RemoteStream>, mode_hint: &str) -> Self {
        let peer = stream.peer();
        if let Err(e) = stream.clear_deadlines() {
            tracing::debug!(%peer, error = %e, "could not clear remote socket deadlines");
        }
        Self {
            stream,
            mode: RemoteMode::from_hint(mode_hint),
            peer,
        }
    }

    pub fn mode(&self) -> RemoteMode {
        self.mode
    }

    pub fn peer(&self) -> &str {
        &self.peer
    }

    /// Send one line.
    pub fn send(&mut self, line: &str) -> Result<(), SinkError> {
        let mut buf = String::with_capacity(line.len() + 1);
        buf.push_str(line);
        buf.push('\n');
        self.stream
            .write_all(buf.as_bytes())
            .and_then(|()| self.stream.flush())
            .map_err(|source| SinkError::Remote {
                peer: self.peer.clone(),
                source,
            })
    }

    /// Write the sign-off (best effort), shut the socket down and release it.
    /// Returns the peer identity for the caller's housekeeping line.
    pub fn close(mut self) -> String {
        let line = sign_off_line(self.mode, chrono::Utc::now());
        if let Err(e) = self.send(&line) {
            tracing::debug!(error = %e, "remote sign-off not delivered");
        }
        if let Err(e) = self.stream.shutdown() {
            tracing::debug!(peer = %self.peer, error = %e, "remote socket shutdown failed");
        }
        self.peer
    }
}

impl std::fmt::Debug for RemoteSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteSession")
            .field("mode", &self.mode)
            .field("peer", &self.peer)
            .finish_non_exhaustive()
    }
}

/// The terminal line for a session in `mode`.
pub fn sign_off_line(mode: RemoteMode, now: chrono::DateTime<chrono::Utc>) -> String {
    match mode {
        RemoteMode::Raw => SIGN_OFF.to_string(),
        RemoteMode::Json => json_line(
            SIGN_OFF_LEVEL,
            now.timestamp_micros() as f64 / 1_000_000.0,
            &[SIGN_OFF_CALLER.to_string()],
            SIGN_OFF,
        ),
        RemoteMode::Colored => colored(SIGN_OFF, Level::Info.color()),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
