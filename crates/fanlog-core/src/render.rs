//! Text and json render forms shared by the console, file and remote sinks.
//!
//! | Form      | Shape                                                        |
//! |-----------|--------------------------------------------------------------|
//! | colored   | `<time> <colored name chain>: <colored message>`             |
//! | raw       | `<time> <LEVEL padded to 5> <name chain>: <message>`         |
//! | json      | `{"lvl": .., "time": <float secs>, "callers": [..], "msg": ..}` |
//! | file body | `<name chain>: <message>` (the file handler adds its own stamp) |
//!
//! `<time>` is local `YYYY.MM.DD HH:MM:SS`, with `.mmm` appended when the
//! epoch asks for milliseconds.

use crate::error::CoreError;
use crate::types::LogRecord;
use chrono::{DateTime, Local, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt::Display;
use std::str::FromStr;
use std::sync::Arc;

pub const COLOR_END: &str = "\x1b[0m";
/// Root segment of a name chain.
pub const NAME_COLOR: &str = "1;36";
/// Nested segments of a name chain.
pub const MODULE_COLOR: &str = "36";

const NAME_CACHE_CAPACITY: usize = 512;

/// Wrap `text` in an ANSI SGR color sequence.
pub fn colored(text: &str, color: impl Display) -> String {
    format!("\x1b[{color}m{text}{COLOR_END}")
}

pub fn time_string(ts: DateTime<Utc>, with_ms: bool) -> String {
    let local = ts.with_timezone(&Local);
    let mut out = local.format("%Y.%m.%d %H:%M:%S").to_string();
    if with_ms {
        out.push_str(&format!(".{:03}", local.timestamp_subsec_millis() % 1000));
    }
    out
}

/// Join a name path with `->`, optionally coloring the root and nested
/// segments differently.
pub fn name_chain(names: &[String], colorize: bool) -> String {
    names
        .iter()
        .enumerate()
        .map(|(i, name)| match (colorize, i) {
            (false, _) => name.clone(),
            (true, 0) => colored(name, NAME_COLOR),
            (true, _) => colored(name, MODULE_COLOR),
        })
        .collect::<Vec<_>>()
        .join("->")
}

#[derive(Serialize)]
struct JsonLine<'a> {
    lvl: &'a str,
    time: f64,
    callers: &'a [String],
    msg: &'a str,
}

/// Serialize one json-mode line. Non-ASCII text is kept verbatim.
pub fn json_line(lvl: &str, time: f64, callers: &[String], msg: &str) -> String {
    serde_json::to_string(&JsonLine {
        lvl,
        time,
        callers,
        msg,
    })
    .unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Remote modes
// ---------------------------------------------------------------------------

/// Wire form requested by a remote viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RemoteMode {
    Raw,
    Json,
    #[default]
    Colored,
}

impl RemoteMode {
    /// Resolve a client-supplied hint, falling back to [`RemoteMode::Colored`]
    /// for anything unrecognized.
    pub fn from_hint(hint: &str) -> Self {
        hint.parse().unwrap_or_default()
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            RemoteMode::Raw => "raw",
            RemoteMode::Json => "json",
            RemoteMode::Colored => "colored",
        }
    }
}

impl FromStr for RemoteMode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "raw" => Ok(RemoteMode::Raw),
            "json" => Ok(RemoteMode::Json),
            "colored" => Ok(RemoteMode::Colored),
            other => Err(CoreError::UnknownMode(other.to_string())),
        }
    }
}

impl std::fmt::Display for RemoteMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Name cache
// ---------------------------------------------------------------------------

/// Bounded memo of rendered name chains. Purely a speed-up: a miss renders
/// the chain again, and a full cache is simply emptied.
#[derive(Debug, Default)]
pub struct NameCache {
    entries: HashMap<(Arc<[String]>, bool), Arc<str>>,
}

impl NameCache {
    pub fn get(&mut self, names: &Arc<[String]>, colorize: bool) -> Arc<str> {
        let key = (Arc::clone(names), colorize);
        if let Some(hit) = self.entries.get(&key) {
            return Arc::clone(hit);
        }
        if self.entries.len() >= NAME_CACHE_CAPACITY {
            self.entries.clear();
        }
        let rendered: Arc<str> = name_chain(names, colorize).into();
        self.entries.insert(key, Arc::clone(&rendered));
        rendered
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Renderer
// ---------------------------------------------------------------------------

/// Formats records for every sink. Owned by the pipeline thread, so the
/// cache needs no locking.
#[derive(Debug, Default)]
pub struct Renderer {
    names: NameCache,
    show_ms: bool,
}

impl Renderer {
    pub fn new(show_ms: bool) -> Self {
        Self {
            names: NameCache::default(),
            show_ms,
        }
    }

    pub fn set_show_milliseconds(&mut self, show_ms: bool) {
        self.show_ms = show_ms;
    }

    pub fn time(&self, ts: DateTime<Utc>) -> String {
        time_string(ts, self.show_ms)
    }

    pub fn colored(&mut self, record: &LogRecord) -> String {
        let chain = self.names.get(&record.name_path, true);
        format!(
            "{} {}: {}",
            self.time(record.ts),
            chain,
            colored(&record.message, record.level.color())
        )
    }

    pub fn raw(&mut self, record: &LogRecord) -> String {
        let chain = self.names.get(&record.name_path, false);
        format!(
            "{} {} {}: {}",
            self.time(record.ts),
            record.level.padded(),
            chain,
            record.message
        )
    }

    pub fn json(&self, record: &LogRecord) -> String {
        json_line(
            record.level.padded(),
            record.unix_seconds(),
            &record.name_path,
            &record.message,
        )
    }

    /// Body handed to the rotating file handler.
    pub fn file_body(&mut self, record: &LogRecord) -> String {
        let chain = self.names.get(&record.name_path, false);
        format!("{}: {}", chain, record.message)
    }

    pub fn render(&mut self, mode: RemoteMode, record: &LogRecord) -> String {
        match mode {
            RemoteMode::Raw => self.raw(record),
            RemoteMode::Json => self.json(record),
            RemoteMode::Colored => self.colored(record),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
