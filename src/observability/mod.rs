//! Observability for habitlog
//!
//! Structured JSON logging through an explicitly passed [`Logger`] handle.
//!
//! # Usage
//!
//! ```ignore
//! use habitlog::observability::{Event, Logger, Severity};
//!
//! let logger = Logger::stdio(Severity::Info);
//! logger.info(Event::DatabaseConnected, &[("driver", "sqlite")]);
//! ```

mod events;
mod logger;

pub use events::Event;
pub use logger::{LogBuffer, Logger, Severity};
