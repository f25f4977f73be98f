//! Observable events for habitlog
//!
//! Every log line names exactly one event. Events are explicit and typed so
//! call sites cannot drift into free-form message strings.

use std::fmt;

/// Observable events in habitlog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Lifecycle
    /// Configuration resolved from flags and environment
    ConfigLoaded,
    /// HTTP listener bound, ready to serve
    Serving,
    /// Shutdown signal received
    ShutdownStart,
    /// In-flight requests did not drain within the bound
    ShutdownTimedOut,
    /// Storage released, process about to exit
    ShutdownComplete,

    // Storage
    /// Connection pool opened and pinged
    DatabaseConnected,
    /// Schema created or already present
    SchemaReady,
    /// Connection pool closed
    DatabaseClosed,

    // Requests
    /// One completed HTTP request
    HttpRequest,
    /// A handler failed with a server-side error
    RequestFailed,
    /// A handler panicked and was converted to a 500
    RequestPanic,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::Serving => "HABITLOG_SERVING",
            Event::ShutdownStart => "SHUTDOWN_START",
            Event::ShutdownTimedOut => "SHUTDOWN_TIMED_OUT",
            Event::ShutdownComplete => "SHUTDOWN_COMPLETE",

            Event::DatabaseConnected => "DATABASE_CONNECTED",
            Event::SchemaReady => "SCHEMA_READY",
            Event::DatabaseClosed => "DATABASE_CLOSED",

            Event::HttpRequest => "HTTP_REQUEST",
            Event::RequestFailed => "REQUEST_FAILED",
            Event::RequestPanic => "REQUEST_PANIC",
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
