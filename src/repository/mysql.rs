//! MySQL record store

use async_trait::async_trait;
use sqlx::mysql::{MySqlPool, MySqlPoolOptions};
use sqlx::Connection;

use crate::model::{Record, Stats, StatsWindow};

use super::errors::{StorageError, StorageResult};
use super::schema;
use super::{now, RecordRepository};

/// Record store on a MySQL server
#[derive(Debug, Clone)]
pub struct MySqlRecordRepository {
    pool: MySqlPool,
}

impl MySqlRecordRepository {
    /// Connect with a `mysql://` URL and ensure the schema
    pub async fn connect(dsn: &str) -> StorageResult<Self> {
        let pool = MySqlPoolOptions::new()
            .max_connections(10)
            .connect(dsn)
            .await?;
        pool.acquire().await?.ping().await?;

        let repo = Self { pool };
        repo.init_schema().await?;
        Ok(repo)
    }

    /// Create the table (with its date index) if absent
    pub async fn init_schema(&self) -> StorageResult<()> {
        for statement in schema::MYSQL_SCHEMA {
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
impl RecordRepository for MySqlRecordRepository {
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

        let id = result.last_insert_id();
        record.id = i64::try_from(id).map_err(|_| StorageError::IdOutOfRange(id))?;
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
        // updated_at always moves, so a matched row is never reported as
        // unchanged by the server.
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
        let (total_records, total_duration) =
            sqlx::query_as::<_, (i64, i64)>(schema::MYSQL_TOTALS)
                .fetch_one(&self.pool)
                .await?;

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
