//! Record entity, request body and derived statistics.

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Format shared by stored `date` values and the stats window bounds.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A row from the `records` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub id: i64,
    pub date: String,
    pub content: String,
    pub duration: i64,
    pub notes: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Record {
    /// Unsaved record built from a request body. `id` and timestamps are
    /// assigned by storage.
    pub fn from_input(input: RecordInput) -> Self {
        let epoch = DateTime::<Utc>::default();
        Self {
            id: 0,
            date: input.date,
            content: input.content,
            duration: input.duration,
            notes: input.notes,
            created_at: epoch,
            updated_at: epoch,
        }
    }

    /// Full replace of the client-editable fields.
    pub fn apply(&mut self, input: RecordInput) {
        self.date = input.date;
        self.content = input.content;
        self.duration = input.duration;
        self.notes = input.notes;
    }
}

/// Body of create and update requests.
///
/// Missing fields decode to their empty value so they are reported as
/// invalid input rather than as a malformed body. Unknown fields (`id`,
/// `createdAt`, ...) are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecordInput {
    pub date: String,
    pub content: String,
    pub duration: i64,
    pub notes: String,
}

impl RecordInput {
    /// First violated field rule, if any.
    pub fn violation(&self) -> Option<&'static str> {
        if self.date.is_empty() {
            Some("date is required")
        } else if self.content.is_empty() {
            Some("content is required")
        } else if self.duration < 1 {
            Some("duration must be at least 1")
        } else {
            None
        }
    }
}

/// Aggregate statistics over all records. Computed on every request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub total_records: i64,
    pub total_duration: i64,
    pub this_week: i64,
    pub this_month: i64,
}

/// Lower bounds for the weekly and monthly counts.
///
/// Weeks start on Sunday. Both bounds are formatted like stored dates so a
/// plain string comparison in SQL selects the window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsWindow {
    pub week_start: String,
    pub month_start: String,
}

impl StatsWindow {
    /// Window containing `today`.
    pub fn containing(today: NaiveDate) -> Self {
        let back = i64::from(today.weekday().num_days_from_sunday());
        let week_start = today - Duration::days(back);
        let month_start = today.with_day(1).unwrap_or(today);

        Self {
            week_start: week_start.format(DATE_FORMAT).to_string(),
            month_start: month_start.format(DATE_FORMAT).to_string(),
        }
    }

    /// Window for the server's local date right now.
    pub fn current() -> Self {
        Self::containing(chrono::Local::now().date_naive())
    }
}
