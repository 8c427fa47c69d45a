//! Video store backends.
//!
//! `VideoRepository` is the explicit store contract for video records; the
//! in-memory backend covers development and tests, the Postgres backend
//! covers real deployments. Both derive `dataUrl` from the configured public
//! base URL at creation time and keep the like counter equal to the liker-set
//! cardinality.

pub mod memory;
pub mod postgres;
pub mod repository;

pub use memory::InMemoryVideoRepository;
pub use postgres::PgVideoRepository;
pub use repository::VideoRepository;
