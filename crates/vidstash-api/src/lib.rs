//! HTTP layer of the vidstash service.
//!
//! Thin axum handlers over an injected `VideoRepository` (video records) and
//! `DataStore` (binary payloads). Exposed as a library so integration tests
//! can build the router without starting a process.

pub mod api_doc;
pub mod error;
pub mod handlers;
pub mod identity;
pub mod middleware;
pub mod setup;
pub mod state;
