//! SQLite record store

use std::str::FromStr;

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::Connection;

use crate::model::{Record, Stats, StatsWindow};

use super::errors::{StorageError, StorageResult};
use super::schema;
use super::{now, RecordRepository};

/// Record store on a SQLite file (or in-memory database)
#[derive(Debug, Clone)]
pub struct SqliteRecordRepository {
    pool: SqlitePool,
}

impl SqliteRecordRepository {
    /// Open the database, creating the file if needed, and ensure the schema
    pub async fn connect(dsn: &str) -> StorageResult<Self> {
        let options = SqliteConnectOptions::from_str(dsn)?.create_if_missing(true);

        let mut pool_options = SqlitePoolOptions::new().max_connections(5);
        if dsn.contains(":memory:") {
            // An in-memory database lives only as long as its connection.
            pool_options = pool_options
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None);
        }

        let pool = pool_options.connect_with(options).await?;
        pool.acquire().await?.ping().await?;

        let repo = Self { pool };
        repo.init_schema().await?;
        Ok(repo)
    }

    /// Create the table and date index if absent
    pub async fn init_schema(&self) -> StorageResult<()> {
        for statement in schema::SQLITE_SCHEMA {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        Ok(())
    }

    async fn count_since(&self, bound: &str) -> StorageResult<i64> {
        let count = sqlx::query_scalar::<_, i64>(schema::COUNT_SINCE)
            .bind(bound)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

#[async_trait]
impl RecordRepository for SqliteRecordRepository {
    async fn create(&self, record: &mut Record) -> StorageResult<()> {
        let ts = now();
        let result = sqlx::query(schema::INSERT_RECORD)
            .bind(&record.date)
            .bind(&record.content)
            .bind(record.duration)
            .bind(&record.notes)
            .bind(ts)
            .bind(ts)
            .execute(&self.pool)
            .await?;

        record.id = result.last_insert_rowid();
        record.created_at = ts;
        record.updated_at = ts;
        Ok(())
    }

    async fn get_by_id(&self, id: i64) -> StorageResult<Option<Record>> {
        let record = sqlx::query_as::<_, Record>(schema::SELECT_BY_ID)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(record)
    }

    async fn get_all(&self) -> StorageResult<Vec<Record>> {
        let records = sqlx::query_as::<_, Record>(schema::SELECT_ALL)
            .fetch_all(&self.pool)
            .await?;
        Ok(records)
    }

    async fn update(&self, record: &mut Record) -> StorageResult<()> {
        let ts = now();
        let result = sqlx::query(schema::UPDATE_RECORD)
            .bind(&record.date)
            .bind(&record.content)
            .bind(record.duration)
            .bind(&record.notes)
            .bind(ts)
            .bind(record.id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound(record.id));
        }
        record.updated_at = ts;
        Ok(())
    }

    async fn delete(&self, id: i64) -> StorageResult<()> {
        let result = sqlx::query(schema::DELETE_RECORD)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound(id));
        }
        Ok(())
    }

    async fn get_stats(&self) -> StorageResult<Stats> {
        let (total_records, total) = sqlx::query_as::<_, (i64, f64)>(schema::SQLITE_TOTALS)
            .fetch_one(&self.pool)
            .await?;
        // Float-to-int `as` saturates at i64::MAX
        let total_duration = total as i64;

        let window = StatsWindow::current();
        let this_week = self.count_since(&window.week_start).await?;
        let this_month = self.count_since(&window.month_start).await?;

        Ok(Stats {
            total_records,
            total_duration,
            this_week,
            this_month,
        })
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}
