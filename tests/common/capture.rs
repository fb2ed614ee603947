//! Console capture and line parsing helpers.

use std::io::Write;
use std::sync::{Arc, Mutex};

/// Cloneable in-memory stand-in for standard output.
#[derive(Clone, Default)]
pub struct CapturedConsole {
    buf: Arc<Mutex<Vec<u8>>>,
}

impl CapturedConsole {
    pub fn raw_text(&self) -> String {
        String::from_utf8_lossy(&self.buf.lock().unwrap()).into_owned()
    }

    /// Captured lines with ANSI color sequences removed.
    pub fn lines(&self) -> Vec<String> {
        self.raw_text().lines().map(strip_ansi).collect()
    }

    /// Message part of every line whose name chain is `chain`.
    pub fn messages_from(&self, chain: &str) -> Vec<String> {
        messages_from(&self.lines(), chain)
    }
}

impl Write for CapturedConsole {
    fn write(&mut self, data: &[u8]) -> std::io::Result<usize> {
        self.buf.lock().unwrap().extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

pub fn strip_ansi(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut chars = line.chars();
    while let Some(c) = chars.next() {
        if c == '\x1b' {
            for skipped in chars.by_ref() {
                if skipped == 'm' {
                    break;
                }
            }
        } else {
            out.push(c);
        }
    }
    out
}

/// Split `"<stamp> [LEVEL] <chain>: <message>"` and keep messages whose chain
/// (the last whitespace-separated token before `": "`) equals `chain`.
pub fn messages_from(lines: &[String], chain: &str) -> Vec<String> {
    lines
        .iter()
        .filter_map(|line| {
            let (head, message) = line.split_once(": ")?;
            let actual = head.rsplit(' ').next()?;
            (actual == chain).then(|| message.to_string())
        })
        .collect()
}

/// Same as [`messages_from`] but for every chain starting with `prefix`.
pub fn messages_with_prefix(lines: &[String], prefix: &str) -> Vec<String> {
    lines
        .iter()
        .filter_map(|line| {
            let (head, message) = line.split_once(": ")?;
            let actual = head.rsplit(' ').next()?;
            actual.starts_with(prefix).then(|| message.to_string())
        })
        .collect()
}

pub fn read_lines(path: &std::path::Path) -> Vec<String> {
    std::fs::read_to_string(path)
        .unwrap_or_default()
        .lines()
        .map(str::to_string)
        .collect()
}
