//! Record HTTP Routes
//!
//! CRUD over habit records plus the stats endpoint. Mounted under `/api`.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, DefaultBodyLimit, Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};

use crate::model::{Record, RecordInput, Stats};
use crate::observability::{Event, Logger};
use crate::service::{RecordService, ServiceError};

use super::errors::ApiError;

// ==================
// Shared State
// ==================

/// State shared across record handlers
pub struct RecordState {
    pub service: RecordService,
    pub logger: Logger,
}

impl RecordState {
    pub fn new(service: RecordService, logger: Logger) -> Self {
        Self { service, logger }
    }

    /// Map a service error to its client error, logging server-side faults.
    /// `failure` is the generic message sent for those faults.
    fn reject(&self, failure: &'static str, err: ServiceError) -> ApiError {
        match err {
            ServiceError::InvalidInput(reason) => ApiError::InvalidInput(reason),
            ServiceError::NotFound => ApiError::NotFound,
            ServiceError::Storage(source) => {
                self.logger.error(
                    Event::RequestFailed,
                    &[("error", &source.to_string()), ("operation", failure)],
                );
                ApiError::Internal(failure)
            }
        }
    }
}

type SharedState = Arc<RecordState>;

// ==================
// Record Routes
// ==================

/// Create record routes
///
/// Request bodies are not size-limited; `content` and `notes` have no
/// maximum length.
pub fn record_routes(state: SharedState) -> Router {
    Router::new()
        .route(
            "/records",
            get(list_records_handler)
                .post(create_record_handler)
                .fallback(method_not_allowed_handler),
        )
        .route(
            "/records/:id",
            get(get_record_handler)
                .put(update_record_handler)
                .delete(delete_record_handler)
                .fallback(method_not_allowed_handler),
        )
        .route(
            "/stats",
            get(get_stats_handler).fallback(method_not_allowed_handler),
        )
        .layer(DefaultBodyLimit::disable())
        .with_state(state)
}

// ==================
// Helper Functions
// ==================

fn parse_id(raw: &str) -> Result<i64, ApiError> {
    raw.parse::<i64>().map_err(|_| ApiError::InvalidId)
}

/// Decode a JSON body regardless of content type. A body that could not be
/// read at all is reported the same as one that is not valid JSON.
fn parse_body(body: Result<Bytes, BytesRejection>) -> Result<RecordInput, ApiError> {
    let body = body.map_err(|_| ApiError::InvalidBody)?;
    serde_json::from_slice(&body).map_err(|_| ApiError::InvalidBody)
}

// ==================
// Handlers
// ==================

async fn list_records_handler(
    State(state): State<SharedState>,
) -> Result<Json<Vec<Record>>, ApiError> {
    let records = state
        .service
        .get_all()
        .await
        .map_err(|e| state.reject("failed to get records", e))?;
    Ok(Json(records))
}

async fn create_record_handler(
    State(state): State<SharedState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<(StatusCode, Json<Record>), ApiError> {
    let input = parse_body(body)?;
    let record = state
        .service
        .create(input)
        .await
        .map_err(|e| state.reject("failed to create record", e))?;
    Ok((StatusCode::CREATED, Json(record)))
}

async fn get_record_handler(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<Record>, ApiError> {
    let id = parse_id(&id)?;
    let record = state
        .service
        .get_by_id(id)
        .await
        .map_err(|e| state.reject("failed to get record", e))?;
    Ok(Json(record))
}

async fn update_record_handler(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<Record>, ApiError> {
    let id = parse_id(&id)?;
    let input = parse_body(body)?;
    let record = state
        .service
        .update(id, input)
        .await
        .map_err(|e| state.reject("failed to update record", e))?;
    Ok(Json(record))
}

async fn delete_record_handler(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id)?;
    state
        .service
        .delete(id)
        .await
        .map_err(|e| state.reject("failed to delete record", e))?;
    Ok(StatusCode::NO_CONTENT)
}

async fn get_stats_handler(State(state): State<SharedState>) -> Result<Json<Stats>, ApiError> {
    let stats = state
        .service
        .get_stats()
        .await
        .map_err(|e| state.reject("failed to get stats", e))?;
    Ok(Json(stats))
}

async fn method_not_allowed_handler() -> ApiError {
    ApiError::MethodNotAllowed
}
