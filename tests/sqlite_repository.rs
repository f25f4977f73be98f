//! SQLite Record Store Tests
//!
//! Exercises the storage contract against a real SQLite file:
//! - ids are assigned once and never reused
//! - absence on read is `None`, absence on write is `NotFound`
//! - listing order is date DESC, id DESC
//! - stats totals and week/month windows

use std::sync::Arc;

use chrono::Local;
use habitlog::model::{Record, RecordInput, StatsWindow, DATE_FORMAT};
use habitlog::repository::{RecordRepository, SqliteRecordRepository, StorageError};
use habitlog::service::{RecordService, ServiceError};
use tempfile::TempDir;

// =============================================================================
// Test Utilities
// =============================================================================

async fn open_repo(temp_dir: &TempDir) -> SqliteRecordRepository {
    let path = temp_dir.path().join("habits.db");
    SqliteRecordRepository::connect(&path.to_string_lossy())
        .await
        .expect("Failed to open sqlite store")
}

fn create_temp_data_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp dir")
}

fn new_record(date: &str, content: &str, duration: i64) -> Record {
    Record::from_input(RecordInput {
        date: date.to_string(),
        content: content.to_string(),
        duration,
        notes: String::new(),
    })
}

fn today() -> String {
    Local::now().date_naive().format(DATE_FORMAT).to_string()
}

// =============================================================================
// Create / Read
// =============================================================================

#[tokio::test]
async fn test_create_assigns_id_and_timestamps() {
    let temp_dir = create_temp_data_dir();
    let repo = open_repo(&temp_dir).await;

    let mut record = new_record("2024-01-15", "Meditate", 15);
    record.notes = "morning".to_string();
    repo.create(&mut record).await.unwrap();

    assert!(record.id > 0);
    assert_eq!(record.created_at, record.updated_at);

    let fetched = repo.get_by_id(record.id).await.unwrap().unwrap();
    assert_eq!(fetched, record);
}

#[tokio::test]
async fn test_get_missing_is_none() {
    let temp_dir = create_temp_data_dir();
    let repo = open_repo(&temp_dir).await;

    assert!(repo.get_by_id(12345).await.unwrap().is_none());
}

#[tokio::test]
async fn test_get_all_empty() {
    let temp_dir = create_temp_data_dir();
    let repo = open_repo(&temp_dir).await;

    assert!(repo.get_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_get_all_orders_by_date_then_id_desc() {
    let temp_dir = create_temp_data_dir();
    let repo = open_repo(&temp_dir).await;

    let mut older = new_record("2024-01-10", "Older", 10);
    let mut newer = new_record("2024-01-20", "Newer", 10);
    let mut same_day = new_record("2024-01-10", "Same day, later insert", 10);
    repo.create(&mut older).await.unwrap();
    repo.create(&mut newer).await.unwrap();
    repo.create(&mut same_day).await.unwrap();

    let ids: Vec<i64> = repo.get_all().await.unwrap().iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![newer.id, same_day.id, older.id]);
}

// =============================================================================
// Update / Delete
// =============================================================================

#[tokio::test]
async fn test_update_replaces_fields() {
    let temp_dir = create_temp_data_dir();
    let repo = open_repo(&temp_dir).await;

    let mut record = new_record("2024-01-15", "Run", 30);
    repo.create(&mut record).await.unwrap();
    let created_at = record.created_at;

    record.date = "2024-01-16".to_string();
    record.content = "Swim".to_string();
    record.duration = 45;
    record.notes = "pool".to_string();
    repo.update(&mut record).await.unwrap();

    let fetched = repo.get_by_id(record.id).await.unwrap().unwrap();
    assert_eq!(fetched.content, "Swim");
    assert_eq!(fetched.duration, 45);
    assert_eq!(fetched.notes, "pool");
    assert_eq!(fetched.created_at, created_at);
    assert!(fetched.updated_at >= fetched.created_at);
}

#[tokio::test]
async fn test_update_missing_is_not_found() {
    let temp_dir = create_temp_data_dir();
    let repo = open_repo(&temp_dir).await;

    let mut ghost = new_record("2024-01-15", "Ghost", 5);
    ghost.id = 77;
    let err = repo.update(&mut ghost).await.unwrap_err();
    assert!(matches!(err, StorageError::NotFound(77)));
    assert!(repo.get_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_delete_and_missing_delete() {
    let temp_dir = create_temp_data_dir();
    let repo = open_repo(&temp_dir).await;

    let mut record = new_record("2024-01-15", "Run", 30);
    repo.create(&mut record).await.unwrap();

    repo.delete(record.id).await.unwrap();
    assert!(repo.get_by_id(record.id).await.unwrap().is_none());
    assert!(repo.delete(record.id).await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn test_ids_not_reused_after_delete() {
    let temp_dir = create_temp_data_dir();
    let repo = open_repo(&temp_dir).await;

    let mut first = new_record("2024-01-15", "A", 10);
    repo.create(&mut first).await.unwrap();
    repo.delete(first.id).await.unwrap();

    let mut second = new_record("2024-01-15", "B", 10);
    repo.create(&mut second).await.unwrap();
    assert!(second.id > first.id);
}

#[tokio::test]
async fn test_data_survives_reopen() {
    let temp_dir = create_temp_data_dir();

    let id = {
        let repo = open_repo(&temp_dir).await;
        let mut record = new_record("2024-01-15", "Persisted", 20);
        repo.create(&mut record).await.unwrap();
        repo.close().await;
        record.id
    };

    let repo = open_repo(&temp_dir).await;
    let fetched = repo.get_by_id(id).await.unwrap().unwrap();
    assert_eq!(fetched.content, "Persisted");
}

#[tokio::test]
async fn test_closed_pool_is_storage_fault() {
    let temp_dir = create_temp_data_dir();
    let repo = open_repo(&temp_dir).await;
    repo.close().await;

    let err = repo.get_all().await.unwrap_err();
    assert!(matches!(err, StorageError::Database(_)));
}

// =============================================================================
// Stats
// =============================================================================

#[tokio::test]
async fn test_stats_empty() {
    let temp_dir = create_temp_data_dir();
    let repo = open_repo(&temp_dir).await;

    let stats = repo.get_stats().await.unwrap();
    assert_eq!(stats.total_records, 0);
    assert_eq!(stats.total_duration, 0);
    assert_eq!(stats.this_week, 0);
    assert_eq!(stats.this_month, 0);
}

#[tokio::test]
async fn test_stats_totals() {
    let temp_dir = create_temp_data_dir();
    let repo = open_repo(&temp_dir).await;

    repo.create(&mut new_record("2024-01-15", "Test 1", 30)).await.unwrap();
    repo.create(&mut new_record("2024-01-16", "Test 2", 45)).await.unwrap();

    let stats = repo.get_stats().await.unwrap();
    assert_eq!(stats.total_records, 2);
    assert_eq!(stats.total_duration, 75);
}

#[tokio::test]
async fn test_stats_total_duration_saturates() {
    let temp_dir = create_temp_data_dir();
    let repo = open_repo(&temp_dir).await;

    repo.create(&mut new_record("2024-01-15", "Long", i64::MAX)).await.unwrap();
    repo.create(&mut new_record("2024-01-16", "Longer", i64::MAX)).await.unwrap();

    let stats = repo.get_stats().await.unwrap();
    assert_eq!(stats.total_records, 2);
    assert_eq!(stats.total_duration, i64::MAX);
}

#[tokio::test]
async fn test_stats_windows() {
    let temp_dir = create_temp_data_dir();
    let repo = open_repo(&temp_dir).await;
    let window = StatsWindow::current();

    let dates = [
        today(),
        window.week_start.clone(),
        window.month_start.clone(),
        "2000-01-01".to_string(),
    ];
    for date in &dates {
        repo.create(&mut new_record(date, "Habit", 10)).await.unwrap();
    }

    let count_since = |bound: &str| dates.iter().filter(|d| d.as_str() >= bound).count() as i64;

    let stats = repo.get_stats().await.unwrap();
    assert_eq!(stats.total_records, 4);
    assert_eq!(stats.this_week, count_since(&window.week_start));
    assert_eq!(stats.this_month, count_since(&window.month_start));
    // Today is always inside both windows, the year-2000 record never is
    assert!(stats.this_week >= 2);
    assert!(stats.this_month >= 2);
    assert!(stats.this_month <= 3);
}

// =============================================================================
// Service over SQLite
// =============================================================================

#[tokio::test]
async fn test_service_round_trip() {
    let temp_dir = create_temp_data_dir();
    let service = RecordService::new(Arc::new(open_repo(&temp_dir).await));

    let created = service
        .create(RecordInput {
            date: "2024-01-15".to_string(),
            content: "Journal".to_string(),
            duration: 10,
            notes: "three pages".to_string(),
        })
        .await
        .unwrap();

    let fetched = service.get_by_id(created.id).await.unwrap();
    assert_eq!(fetched.date, created.date);
    assert_eq!(fetched.content, created.content);
    assert_eq!(fetched.duration, created.duration);
    assert_eq!(fetched.notes, created.notes);
}

#[tokio::test]
async fn test_racing_updates_leave_one_payload() {
    let temp_dir = create_temp_data_dir();
    let service = RecordService::new(Arc::new(open_repo(&temp_dir).await));

    let created = service
        .create(RecordInput {
            date: "2024-01-15".to_string(),
            content: "Original".to_string(),
            duration: 10,
            notes: String::new(),
        })
        .await
        .unwrap();

    let a = RecordInput {
        date: "2024-02-01".to_string(),
        content: "Payload A".to_string(),
        duration: 11,
        notes: "a".to_string(),
    };
    let b = RecordInput {
        date: "2024-03-01".to_string(),
        content: "Payload B".to_string(),
        duration: 22,
        notes: "b".to_string(),
    };

    let (ra, rb) = tokio::join!(
        service.update(created.id, a.clone()),
        service.update(created.id, b.clone())
    );
    assert!(ra.is_ok() || matches!(ra, Err(ServiceError::NotFound)));
    assert!(rb.is_ok() || matches!(rb, Err(ServiceError::NotFound)));

    let stored = service.get_by_id(created.id).await.unwrap();
    let stored_fields = (stored.date, stored.content, stored.duration, stored.notes);
    let matches_a = stored_fields == (a.date, a.content, a.duration, a.notes);
    let matches_b = stored_fields == (b.date, b.content, b.duration, b.notes);
    assert!(matches_a || matches_b);
}
