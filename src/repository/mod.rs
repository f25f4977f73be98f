//! # Record Storage
//!
//! Durable CRUD over [`Record`] plus the aggregate stats query.
//!
//! The orchestration layer only sees [`RecordRepository`]; the concrete
//! engine is chosen once at startup by [`open_repository`].
//!
//! - `get_by_id` reports absence as `Ok(None)`
//! - `update`/`delete` report zero affected rows as [`StorageError::NotFound`]
//! - every write is a single synchronous statement

mod config;
mod errors;
mod mysql;
mod schema;
mod sqlite;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, SubsecRound, Utc};

use crate::model::{Record, Stats};
use crate::observability::{Event, Logger};

pub use config::{DatabaseConfig, DatabaseDriver};
pub use errors::{StorageError, StorageResult};
pub use mysql::MySqlRecordRepository;
pub use sqlite::SqliteRecordRepository;

/// Storage trait for habit records
#[async_trait]
pub trait RecordRepository: Send + Sync {
    /// Insert a record. Assigns `id`, `created_at` and `updated_at` in place.
    async fn create(&self, record: &mut Record) -> StorageResult<()>;

    /// Fetch one record, `None` if no row has this id
    async fn get_by_id(&self, id: i64) -> StorageResult<Option<Record>>;

    /// All records, newest `date` first, ties broken by descending id
    async fn get_all(&self) -> StorageResult<Vec<Record>>;

    /// Replace date/content/duration/notes by id and refresh `updated_at`
    async fn update(&self, record: &mut Record) -> StorageResult<()>;

    /// Hard delete by id
    async fn delete(&self, id: i64) -> StorageResult<()>;

    /// Totals plus this-week and this-month counts (server local time)
    async fn get_stats(&self) -> StorageResult<Stats>;

    /// Release the connection pool
    async fn close(&self);
}

/// Current time at the precision both engines store.
pub(crate) fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

/// Connect to the configured engine and ensure the schema exists
pub async fn open_repository(
    config: &DatabaseConfig,
    logger: &Logger,
) -> StorageResult<Arc<dyn RecordRepository>> {
    let repo: Arc<dyn RecordRepository> = match config.driver {
        DatabaseDriver::Sqlite => Arc::new(SqliteRecordRepository::connect(&config.dsn).await?),
        DatabaseDriver::Mysql => Arc::new(MySqlRecordRepository::connect(&config.dsn).await?),
    };

    logger.info(
        Event::DatabaseConnected,
        &[("driver", config.driver.as_str())],
    );
    logger.trace(Event::SchemaReady, &[("driver", config.driver.as_str())]);

    Ok(repo)
}
