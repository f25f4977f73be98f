//! habitlog - REST backend for daily habit records
//!
//! Layers, leaves first: `repository` (SQL storage), `service` (validation),
//! `http_server` (routing and JSON).

pub mod cli;
pub mod config;
pub mod http_server;
pub mod model;
pub mod observability;
pub mod repository;
pub mod service;
