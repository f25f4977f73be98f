//! Resolved process configuration
//!
//! Built from CLI flags, which fall back to environment variables and then
//! to defaults (see `cli::args`).

use serde::{Deserialize, Serialize};

use crate::http_server::HttpServerConfig;
use crate::observability::Severity;
use crate::repository::DatabaseConfig;

/// Everything the process needs to boot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: HttpServerConfig,

    #[serde(default)]
    pub database: DatabaseConfig,

    /// Minimum log severity (default: info)
    #[serde(default = "default_log_level", with = "severity_name")]
    pub log_level: Severity,
}

fn default_log_level() -> Severity {
    Severity::Info
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: HttpServerConfig::default(),
            database: DatabaseConfig::default(),
            log_level: default_log_level(),
        }
    }
}

mod severity_name {
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    use crate::observability::Severity;

    pub fn serialize<S: Serializer>(severity: &Severity, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&severity.as_str().to_ascii_lowercase())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Severity, D::Error> {
        let raw = String::deserialize(d)?;
        raw.parse().map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::DatabaseDriver;

    #[test]
    fn test_config_defaults() {
        let config = Config::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.cors_origins, vec!["*".to_string()]);
        assert_eq!(config.database.driver, DatabaseDriver::Sqlite);
        assert_eq!(config.database.dsn, "data.db");
        assert_eq!(config.log_level, Severity::Info);
    }

    #[test]
    fn test_config_from_partial_json() {
        let config: Config = serde_json::from_str(
            r#"{"server": {"port": 9000}, "database": {"driver": "mysql", "dsn": "mysql://u:p@db/habits"}, "log_level": "warn"}"#,
        )
        .unwrap();

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.database.driver, DatabaseDriver::Mysql);
        assert_eq!(config.log_level, Severity::Warn);
    }

    #[test]
    fn test_config_rejects_unknown_log_level() {
        let result: Result<Config, _> = serde_json::from_str(r#"{"log_level": "loud"}"#);
        assert!(result.is_err());
    }
}
