//! CLI command implementations

use std::fs;
use std::path::Path;

use crate::config::Config;
use crate::http_server::{HttpServer, HttpServerConfig};
use crate::observability::{Event, Logger};
use crate::repository::open_repository;
use crate::service::RecordService;

use super::args::{Cli, Command, Settings};
use super::errors::{CliError, CliResult};

/// Load a JSON configuration file
pub fn load_config_file(path: &Path) -> CliResult<Config> {
    let content = fs::read_to_string(path)
        .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

    serde_json::from_str(&content)
        .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))
}

/// Apply flag/env overrides on top of the file (or defaults)
pub fn resolve_config(settings: &Settings) -> CliResult<Config> {
    let mut config = match &settings.config {
        Some(path) => load_config_file(path)?,
        None => Config::default(),
    };

    if let Some(host) = &settings.host {
        config.server.host = host.clone();
    }
    if let Some(port) = settings.port {
        config.server.port = port;
    }
    if let Some(origins) = &settings.cors_origins {
        config.server.cors_origins = HttpServerConfig::parse_origins(origins);
    }
    if let Some(secs) = settings.shutdown_timeout_secs {
        config.server.shutdown_timeout_secs = secs;
    }
    if let Some(driver) = &settings.db_driver {
        config.database.driver = driver.parse()?;
    }
    if let Some(dsn) = &settings.db_dsn {
        config.database.dsn = dsn.clone();
    }
    if let Some(level) = &settings.log_level {
        config.log_level = level.parse().map_err(CliError::config_error)?;
    }

    Ok(config)
}

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command.
/// This is the only function that main.rs should call.
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    run_command(cli)
}

/// Resolve configuration, build the logger and runtime, run the command
pub fn run_command(cli: Cli) -> CliResult<()> {
    let config = resolve_config(&cli.settings)?;
    let logger = Logger::stdio(config.log_level);
    logger.info(
        Event::ConfigLoaded,
        &[
            ("addr", &config.server.socket_addr()),
            ("driver", config.database.driver.as_str()),
        ],
    );

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::boot_failed(format!("Failed to create tokio runtime: {}", e)))?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => rt.block_on(serve(config, logger)),
        Command::InitDb => rt.block_on(init_db(&config, &logger)),
    }
}

/// Open storage and serve HTTP until SIGINT/SIGTERM
pub async fn serve(config: Config, logger: Logger) -> CliResult<()> {
    let repo = open_repository(&config.database, &logger).await?;
    let service = RecordService::new(repo);

    let server = HttpServer::new(config.server, service, logger);
    server.run_until(shutdown_signal()).await?;
    Ok(())
}

/// Open storage (creating the schema) and release it again
pub async fn init_db(config: &Config, logger: &Logger) -> CliResult<()> {
    let repo = open_repository(&config.database, logger).await?;
    repo.close().await;
    logger.info(Event::DatabaseClosed, &[]);
    Ok(())
}

/// Resolves on Ctrl-C, or SIGTERM on Unix
async fn shutdown_signal() {
    let ctrl_c = async {
        // If the handler cannot be installed, only SIGTERM stops the server.
        if tokio::signal::ctrl_c().await.is_err() {
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
