//! Health HTTP Route
//!
//! Liveness probe. Does not touch storage.

use axum::{routing::get, Router};

/// Health check route at `/health`
pub fn health_routes() -> Router {
    Router::new().route("/health", get(health_handler))
}

/// Plain-text `OK` with status 200
async fn health_handler() -> &'static str {
    "OK"
}
