//! # Record Service
//!
//! Validates request bodies and bridges the HTTP layer to storage.
//! Validation runs before any storage call, so a rejected request never
//! touches the database.

mod errors;

use std::sync::Arc;

use crate::model::{Record, RecordInput, Stats};
use crate::repository::RecordRepository;

pub use errors::{ServiceError, ServiceResult};

/// Engine-agnostic record operations
#[derive(Clone)]
pub struct RecordService {
    repo: Arc<dyn RecordRepository>,
}

impl RecordService {
    pub fn new(repo: Arc<dyn RecordRepository>) -> Self {
        Self { repo }
    }

    /// Underlying store, used at shutdown to release it
    pub fn repository(&self) -> &Arc<dyn RecordRepository> {
        &self.repo
    }

    pub async fn create(&self, input: RecordInput) -> ServiceResult<Record> {
        validate(&input)?;

        let mut record = Record::from_input(input);
        self.repo.create(&mut record).await?;
        Ok(record)
    }

    pub async fn get_by_id(&self, id: i64) -> ServiceResult<Record> {
        self.repo
            .get_by_id(id)
            .await?
            .ok_or(ServiceError::NotFound)
    }

    pub async fn get_all(&self) -> ServiceResult<Vec<Record>> {
        Ok(self.repo.get_all().await?)
    }

    /// Full replace of the mutable fields. The existence check and the write
    /// are separate statements; a delete landing in between surfaces as
    /// `NotFound` from the write.
    pub async fn update(&self, id: i64, input: RecordInput) -> ServiceResult<Record> {
        validate(&input)?;

        let mut record = self
            .repo
            .get_by_id(id)
            .await?
            .ok_or(ServiceError::NotFound)?;

        record.apply(input);
        self.repo.update(&mut record).await?;
        Ok(record)
    }

    /// Zero affected rows is `NotFound`; any other storage failure stays a
    /// storage error.
    pub async fn delete(&self, id: i64) -> ServiceResult<()> {
        Ok(self.repo.delete(id).await?)
    }

    pub async fn get_stats(&self) -> ServiceResult<Stats> {
        Ok(self.repo.get_stats().await?)
    }
}

fn validate(input: &RecordInput) -> ServiceResult<()> {
    match input.violation() {
        Some(reason) => Err(ServiceError::InvalidInput(reason)),
        None => Ok(()),
    }
}
