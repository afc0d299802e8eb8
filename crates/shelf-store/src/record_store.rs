//! Record store trait and errors

use async_trait::async_trait;
use shelf_core::ShelfError;
use shelf_models::Book;

/// Error type for store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

impl From<StoreError> for ShelfError {
    fn from(err: StoreError) -> Self {
        ShelfError::Persistence(err.to_string())
    }
}

/// Whole-collection persistence
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Load the collection.
    ///
    /// Never fails: a missing or unreadable document yields an empty
    /// collection.
    async fn load(&self) -> Vec<Book>;

    /// Replace the stored collection. On error the previous document is
    /// still in place.
    async fn save(&self, books: &[Book]) -> StoreResult<()>;

    /// Whether a document has been written yet
    async fn exists(&self) -> bool;

    /// Whether records may exist outside the loaded collection, e.g. in a
    /// corrupt document that was set aside. Nothing should be garbage
    /// collected against the collection while this holds.
    async fn is_degraded(&self) -> bool;
}
