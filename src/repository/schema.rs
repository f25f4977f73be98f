//! Table definitions and shared SQL
//!
//! Schema setup is create-if-absent only. There is no migration history.

/// SQLite DDL, one statement per entry
pub(super) const SQLITE_SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS records (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        date TEXT NOT NULL,
        content TEXT NOT NULL,
        duration INTEGER NOT NULL,
        notes TEXT NOT NULL DEFAULT '',
        created_at DATETIME NOT NULL,
        updated_at DATETIME NOT NULL
    )",
    "CREATE INDEX IF NOT EXISTS idx_records_date ON records(date)",
];

/// MySQL DDL, one statement per entry
pub(super) const MYSQL_SCHEMA: &[&str] = &["CREATE TABLE IF NOT EXISTS records (
        id BIGINT AUTO_INCREMENT PRIMARY KEY,
        date VARCHAR(10) NOT NULL,
        content VARCHAR(255) NOT NULL,
        duration BIGINT NOT NULL,
        notes TEXT NOT NULL,
        created_at DATETIME(6) NOT NULL,
        updated_at DATETIME(6) NOT NULL,
        INDEX idx_records_date (date)
    ) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4"];

pub(super) const INSERT_RECORD: &str = "INSERT INTO records (date, content, duration, notes, created_at, updated_at) \
     VALUES (?, ?, ?, ?, ?, ?)";

pub(super) const SELECT_BY_ID: &str = "SELECT id, date, content, duration, notes, created_at, updated_at \
     FROM records WHERE id = ?";

pub(super) const SELECT_ALL: &str = "SELECT id, date, content, duration, notes, created_at, updated_at \
     FROM records ORDER BY date DESC, id DESC";

pub(super) const UPDATE_RECORD: &str = "UPDATE records SET date = ?, content = ?, duration = ?, notes = ?, updated_at = ? \
     WHERE id = ?";

pub(super) const DELETE_RECORD: &str = "DELETE FROM records WHERE id = ?";

pub(super) const COUNT_SINCE: &str = "SELECT COUNT(*) FROM records WHERE date >= ?";

/// SQLite's SUM raises on i64 overflow; TOTAL is a float that cannot
pub(super) const SQLITE_TOTALS: &str = "SELECT COUNT(*), TOTAL(duration) FROM records";

/// MySQL's SUM yields DECIMAL
pub(super) const MYSQL_TOTALS: &str =
    "SELECT COUNT(*), CAST(COALESCE(SUM(duration), 0) AS SIGNED) FROM records";
