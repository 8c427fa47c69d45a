//! Core domain types for the vidstash service.
//!
//! This crate holds the video data model, the unified error taxonomy, and the
//! environment-driven configuration. It has no HTTP or storage dependencies;
//! the `vidstash-db` and `vidstash-api` crates build on top of it.

pub mod config;
pub mod error;
pub mod models;

pub use config::{Config, DataStoreBackend, RepositoryBackend};
pub use error::{AppError, ErrorMetadata, LogLevel};
