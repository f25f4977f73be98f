//! CLI module for habitlog
//!
//! Provides command-line interface for:
//! - serve: run the HTTP API (default)
//! - init-db: create the schema and exit

mod args;
mod commands;
mod errors;

pub use args::{Cli, Command, Settings};
pub use commands::{init_db, load_config_file, resolve_config, run, run_command, serve};
pub use errors::{CliError, CliErrorCode, CliResult};
