//! Structured JSON logger for habitlog
//!
//! - One log line = one event
//! - Event first, then severity, then fields in alphabetical order
//! - Synchronous, no buffering
//!
//! The logger is an explicit handle. It is built once at startup and passed to
//! the components that log; there is no process-wide instance.

use std::fmt;
use std::io::{self, Write};
use std::str::FromStr;
use std::sync::{Arc, Mutex};

use chrono::{SecondsFormat, Utc};
use serde_json::Value;

use super::events::Event;

/// Log severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Debug-level detail
    Trace = 0,
    /// Normal operations
    Info = 1,
    /// Recoverable issues
    Warn = 2,
    /// Operation failures
    Error = 3,
}

impl Severity {
    /// Returns the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Trace => "TRACE",
            Severity::Info => "INFO",
            Severity::Warn => "WARN",
            Severity::Error => "ERROR",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "trace" | "debug" => Ok(Severity::Trace),
            "info" => Ok(Severity::Info),
            "warn" | "warning" => Ok(Severity::Warn),
            "error" => Ok(Severity::Error),
            other => Err(format!("unknown log level '{}'", other)),
        }
    }
}

#[derive(Clone)]
enum Sink {
    /// INFO and below to stdout, WARN and above to stderr
    Stdio,
    /// Shared in-memory buffer
    Memory(Arc<Mutex<Vec<u8>>>),
}

/// Read side of an in-memory logger
#[derive(Clone)]
pub struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    /// All lines written so far
    pub fn lines(&self) -> Vec<String> {
        let bytes = match self.0.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        };
        String::from_utf8_lossy(&bytes)
            .lines()
            .map(str::to_owned)
            .collect()
    }

    /// Lines parsed as JSON, skipping anything unparseable
    pub fn events(&self) -> Vec<Value> {
        self.lines()
            .iter()
            .filter_map(|line| serde_json::from_str(line).ok())
            .collect()
    }
}

/// A structured logger that outputs JSON lines
#[derive(Clone)]
pub struct Logger {
    min_severity: Severity,
    sink: Sink,
}

impl Logger {
    /// Logger writing to stdout/stderr
    pub fn stdio(min_severity: Severity) -> Self {
        Self {
            min_severity,
            sink: Sink::Stdio,
        }
    }

    /// Logger writing into a shared buffer, returned alongside it
    pub fn memory(min_severity: Severity) -> (Self, LogBuffer) {
        let buffer = Arc::new(Mutex::new(Vec::new()));
        let logger = Self {
            min_severity,
            sink: Sink::Memory(buffer.clone()),
        };
        (logger, LogBuffer(buffer))
    }

    /// Log an event with the given severity and fields
    pub fn log(&self, severity: Severity, event: Event, fields: &[(&str, &str)]) {
        if severity < self.min_severity {
            return;
        }

        let ts = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
        let line = format_line(severity, event, &ts, fields);

        match &self.sink {
            Sink::Stdio if severity >= Severity::Warn => {
                write_line(&mut io::stderr().lock(), &line)
            }
            Sink::Stdio => write_line(&mut io::stdout().lock(), &line),
            Sink::Memory(buffer) => {
                let mut guard = match buffer.lock() {
                    Ok(guard) => guard,
                    Err(poisoned) => poisoned.into_inner(),
                };
                write_line(&mut *guard, &line);
            }
        }
    }

    /// Log at TRACE level
    pub fn trace(&self, event: Event, fields: &[(&str, &str)]) {
        self.log(Severity::Trace, event, fields);
    }

    /// Log at INFO level
    pub fn info(&self, event: Event, fields: &[(&str, &str)]) {
        self.log(Severity::Info, event, fields);
    }

    /// Log at WARN level
    pub fn warn(&self, event: Event, fields: &[(&str, &str)]) {
        self.log(Severity::Warn, event, fields);
    }

    /// Log at ERROR level
    pub fn error(&self, event: Event, fields: &[(&str, &str)]) {
        self.log(Severity::Error, event, fields);
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sink = match self.sink {
            Sink::Stdio => "stdio",
            Sink::Memory(_) => "memory",
        };
        f.debug_struct("Logger")
            .field("min_severity", &self.min_severity)
            .field("sink", &sink)
            .finish()
    }
}

fn write_line<W: Write>(writer: &mut W, line: &str) {
    // One write per line; a failing sink must never fail a request.
    let _ = writer.write_all(line.as_bytes());
    let _ = writer.flush();
}

/// Render one log line, newline-terminated
fn format_line(severity: Severity, event: Event, ts: &str, fields: &[(&str, &str)]) -> String {
    let mut output = String::with_capacity(256);

    output.push_str("{\"event\":");
    push_json_string(&mut output, event.as_str());
    output.push_str(",\"severity\":");
    push_json_string(&mut output, severity.as_str());

    let mut sorted: Vec<(&str, &str)> = fields.to_vec();
    sorted.push(("ts", ts));
    sorted.sort_by_key(|(k, _)| *k);

    for (key, value) in sorted {
        output.push(',');
        push_json_string(&mut output, key);
        output.push(':');
        push_json_string(&mut output, value);
    }

    output.push_str("}\n");
    output
}

fn push_json_string(output: &mut String, s: &str) {
    output.push_str(&Value::String(s.to_owned()).to_string());
}
