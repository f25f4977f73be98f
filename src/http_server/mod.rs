//! # HTTP Server Module
//!
//! JSON API over the record service, built on Axum.
//!
//! # Endpoints
//!
//! - `/health` - Health check
//! - `/api/records` - List and create records
//! - `/api/records/:id` - Fetch, replace and delete one record
//! - `/api/stats` - Aggregate statistics

pub mod config;
pub mod errors;
pub mod health_routes;
pub mod middleware;
pub mod record_routes;
pub mod server;

pub use config::HttpServerConfig;
pub use errors::{ApiError, ErrorResponse, ServerError};
pub use server::HttpServer;
