//! Parser for plain-text workload descriptions.
//!
//! One process per line:
//!
//! ```text
//! # pid arrival burst [priority]
//! 1 0 5
//! 2 1 3 2
//! ```
//!
//! Blank lines and `#` comments are ignored. A line that does not start
//! with three integers, or that describes an impossible process (negative
//! arrival, non-positive burst, times beyond `i32::MAX`), is skipped with a
//! warning and counted in
//! [`Workload::skipped`]. A missing or unparsable priority is 0 and extra
//! trailing tokens are ignored.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::process::ProcessDef;
use crate::types::{Pid, Tick};

/// Errors from loading a workload file.
#[derive(Debug)]
pub enum LoadError {
    /// The file could not be read.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Io { path, source } => {
                write!(f, "failed to read {}: {source}", path.display())
            }
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Io { source, .. } => Some(source),
        }
    }
}

/// Why a single line was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineError {
    /// Fewer than three leading integer fields.
    MissingFields,
    NegativeArrival(i64),
    NonPositiveBurst(i64),
    PidOutOfRange(i64),
    ArrivalOutOfRange(i64),
    BurstOutOfRange(i64),
}

impl fmt::Display for LineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LineError::MissingFields => write!(f, "expected <pid> <arrival> <burst> [priority]"),
            LineError::NegativeArrival(v) => write!(f, "arrival time must be >= 0, got {v}"),
            LineError::NonPositiveBurst(v) => write!(f, "burst time must be > 0, got {v}"),
            LineError::PidOutOfRange(v) => write!(f, "pid {v} out of range"),
            LineError::ArrivalOutOfRange(v) => {
                write!(f, "arrival time {v} exceeds {}", i32::MAX)
            }
            LineError::BurstOutOfRange(v) => write!(f, "burst time {v} exceeds {}", i32::MAX),
        }
    }
}

/// Processes parsed from a workload, in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Workload {
    pub processes: Vec<ProcessDef>,
    /// Non-comment, non-blank lines that were dropped.
    pub skipped: usize,
}

/// Parse one line. `None` for blank lines and comments.
pub fn parse_line(line: &str) -> Option<Result<ProcessDef, LineError>> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return None;
    }

    let mut tokens = trimmed.split_whitespace();
    let mut field = || tokens.next().and_then(|t| t.parse::<i64>().ok());
    let (Some(pid), Some(arrival), Some(burst)) = (field(), field(), field()) else {
        return Some(Err(LineError::MissingFields));
    };
    let priority = field().and_then(|v| i32::try_from(v).ok()).unwrap_or(0);

    Some(validate(pid, arrival, burst, priority))
}

/// Largest accepted arrival or burst.
const MAX_TIME: i64 = i32::MAX as i64;

fn validate(pid: i64, arrival: i64, burst: i64, priority: i32) -> Result<ProcessDef, LineError> {
    let pid = i32::try_from(pid).map_err(|_| LineError::PidOutOfRange(pid))?;
    if arrival < 0 {
        return Err(LineError::NegativeArrival(arrival));
    }
    if arrival > MAX_TIME {
        return Err(LineError::ArrivalOutOfRange(arrival));
    }
    if burst <= 0 {
        return Err(LineError::NonPositiveBurst(burst));
    }
    if burst > MAX_TIME {
        return Err(LineError::BurstOutOfRange(burst));
    }
    Ok(ProcessDef::new(Pid(pid), arrival as Tick, burst as Tick).with_priority(priority))
}

/// Parse a whole workload description.
pub fn parse_workload(text: &str) -> Workload {
    let mut workload = Workload::default();
    for (lineno, line) in text.lines().enumerate() {
        match parse_line(line) {
            None => {}
            Some(Ok(def)) => workload.processes.push(def),
            Some(Err(e)) => {
                warn!(line = lineno + 1, "skipping workload line: {e}");
                workload.skipped += 1;
            }
        }
    }
    debug!(
        processes = workload.processes.len(),
        skipped = workload.skipped,
        "parsed workload"
    );
    workload
}

/// Read and parse a workload file.
pub fn load_workload(path: &Path) -> Result<Workload, LoadError> {
    let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parse_workload(&text))
}
