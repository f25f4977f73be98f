//! CLI argument definitions using clap
//!
//! Commands:
//! - habitlog [serve]
//! - habitlog init-db
//!
//! Each setting resolves as flag, then environment variable, then the
//! optional `--config` JSON file, then the built-in default.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// habitlog - REST backend for daily habit records
#[derive(Parser, Debug)]
#[command(name = "habitlog")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    #[command(flatten)]
    pub settings: Settings,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Run the HTTP server (default)
    Serve,

    /// Create the database schema and exit
    InitDb,
}

/// Overrides applied on top of the config file or defaults
#[derive(Args, Debug, Clone, Default)]
pub struct Settings {
    /// Path to a JSON configuration file
    #[arg(long, global = true, env = "HABITLOG_CONFIG")]
    pub config: Option<PathBuf>,

    /// Host to bind to
    #[arg(long, global = true, env = "SERVER_HOST")]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(long, global = true, env = "SERVER_PORT")]
    pub port: Option<u16>,

    /// Comma-separated allowed CORS origins, `*` for any
    #[arg(long, global = true, env = "CORS_ORIGINS")]
    pub cors_origins: Option<String>,

    /// Storage engine: sqlite or mysql
    #[arg(long, global = true, env = "DB_DRIVER")]
    pub db_driver: Option<String>,

    /// Connection string (file path for sqlite, mysql:// URL for mysql)
    #[arg(long, global = true, env = "DB_DSN")]
    pub db_dsn: Option<String>,

    /// Minimum log level: trace, info, warn, error
    #[arg(long, global = true, env = "LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Seconds to wait for in-flight requests at shutdown
    #[arg(long, global = true, env = "SHUTDOWN_TIMEOUT_SECS")]
    pub shutdown_timeout_secs: Option<u64>,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_defaults_to_none() {
        let cli = Cli::try_parse_from(["habitlog", "--port", "9000"]).unwrap();
        assert_eq!(cli.command, None);
        assert_eq!(cli.settings.port, Some(9000));
    }

    #[test]
    fn test_settings_after_subcommand() {
        let cli = Cli::try_parse_from([
            "habitlog",
            "init-db",
            "--db-driver",
            "sqlite",
            "--db-dsn",
            "/tmp/habits.db",
        ])
        .unwrap();
        assert_eq!(cli.command, Some(Command::InitDb));
        assert_eq!(cli.settings.db_dsn.as_deref(), Some("/tmp/habits.db"));
    }

    #[test]
    fn test_rejects_non_numeric_port() {
        assert!(Cli::try_parse_from(["habitlog", "serve", "--port", "http"]).is_err());
    }
}
