//! FakeRemote — an in-memory [`RemoteStream`] for hand-off tests.
//!
//! Records every write as one entry, can be told to fail from the n-th write
//! onward, and remembers whether the engine cleared deadlines and shut it
//! down.

use fanlog::sinks::remote::SIGN_OFF;
use fanlog::{RemoteOffer, RemoteStream};
use std::io::{self, Write};
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct State {
    writes: Vec<String>,
    attempts: usize,
    fail_from: Option<usize>,
    deadlines_cleared: bool,
    shut_down: bool,
}

#[derive(Clone)]
pub struct FakeRemote {
    peer: String,
    state: Arc<Mutex<State>>,
}

impl FakeRemote {
    pub fn new(peer: &str) -> Self {
        Self {
            peer: peer.to_string(),
            state: Arc::default(),
        }
    }

    /// Writes number `n` (0-based) and later fail with `BrokenPipe`.
    pub fn failing_from(self, n: usize) -> Self {
        self.state.lock().unwrap().fail_from = Some(n);
        self
    }

    /// Successful writes, newline stripped.
    pub fn lines(&self) -> Vec<String> {
        self.state
            .lock()
            .unwrap()
            .writes
            .iter()
            .map(|w| w.trim_end_matches('\n').to_string())
            .collect()
    }

    pub fn write_count(&self) -> usize {
        self.state.lock().unwrap().writes.len()
    }

    pub fn sign_offs(&self) -> usize {
        self.lines().iter().filter(|l| l.contains(SIGN_OFF)).count()
    }

    pub fn deadlines_cleared(&self) -> bool {
        self.state.lock().unwrap().deadlines_cleared
    }

    pub fn is_shut_down(&self) -> bool {
        self.state.lock().unwrap().shut_down
    }

    /// Wrap a clone in an offer, as the network server would.
    pub fn offer(&self, mode: &str) -> (RemoteOffer, fanlog::engine::Released) {
        RemoteOffer::new(Box::new(self.clone()), mode)
    }
}

impl Write for FakeRemote {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut state = self.state.lock().unwrap();
        let attempt = state.attempts;
        state.attempts += 1;
        if state.fail_from.is_some_and(|n| attempt >= n) {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "viewer went away"));
        }
        state.writes.push(String::from_utf8_lossy(buf).into_owned());
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl RemoteStream for FakeRemote {
    fn peer(&self) -> String {
        self.peer.clone()
    }

    fn clear_deadlines(&mut self) -> io::Result<()> {
        self.state.lock().unwrap().deadlines_cleared = true;
        Ok(())
    }

    fn shutdown(&mut self) -> io::Result<()> {
        self.state.lock().unwrap().shut_down = true;
        Ok(())
    }
}
