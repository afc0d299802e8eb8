//! # shelf-api
//!
//! JSON API over the book collection.
//!
//! Mounted under `/api`: `/api/books` for CRUD and `/api/health` for a
//! liveness check. Static cover files are served by the binary, not here.

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod routes;

pub use extractors::AppState;
pub use routes::router;
