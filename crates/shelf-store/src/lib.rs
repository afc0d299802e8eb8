//! # shelf-store
//!
//! Durable storage for the book collection.
//!
//! The whole collection is one JSON document; every save replaces it. The
//! store does no locking of its own: callers that load, mutate and save must
//! serialize those cycles themselves (the record service does).

pub mod json_file;
pub mod memory;
pub mod record_store;

pub use json_file::JsonFileStore;
pub use memory::MemoryRecordStore;
pub use record_store::{RecordStore, StoreError, StoreResult};

#[cfg(any(test, feature = "mock"))]
pub use record_store::MockRecordStore;
