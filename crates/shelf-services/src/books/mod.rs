//! Book services
//!
//! - create: validate, store cover, append, save
//! - update: merge fields, swap cover, save, drop old cover
//! - delete: remove, save, drop cover
//! - sweep: remove covers no book references

mod create;
mod delete;
mod set_attributes;
mod sweep;
mod update;

use std::sync::Arc;

use shelf_attachments::{AttachmentService, Upload};
use shelf_core::{Id, ShelfError, ShelfResult};
use shelf_models::Book;
use shelf_store::RecordStore;
use tokio::sync::Mutex;
use tracing::{debug, warn};

pub use set_attributes::{apply_params, new_book, validate_required};

/// Record service
///
/// Every load-mutate-save cycle runs under `write_lock`, so concurrent
/// requests cannot overwrite each other's changes. Reads go straight to the
/// store.
pub struct BookService {
    store: Arc<dyn RecordStore>,
    attachments: Arc<AttachmentService>,
    write_lock: Mutex<()>,
}

impl BookService {
    pub fn new(store: Arc<dyn RecordStore>, attachments: Arc<AttachmentService>) -> Self {
        Self {
            store,
            attachments,
            write_lock: Mutex::new(()),
        }
    }

    pub fn attachments(&self) -> &AttachmentService {
        &self.attachments
    }

    /// All books in storage order
    pub async fn list(&self) -> Vec<Book> {
        self.store.load().await
    }

    /// A single book
    pub async fn get(&self, id: Id) -> ShelfResult<Book> {
        self.store
            .load()
            .await
            .into_iter()
            .find(|b| b.id == id)
            .ok_or_else(|| ShelfError::book_not_found(id))
    }

    /// Store an uploaded cover and return its public reference
    async fn store_cover(&self, upload: Upload) -> ShelfResult<String> {
        let stored = self.attachments.store(upload).await?;
        debug!(
            reference = %stored.reference,
            content_type = %stored.content_type,
            size = stored.size,
            "Cover ready"
        );
        Ok(stored.reference)
    }

    /// Best-effort removal of a cover nobody should reference any more
    async fn discard_attachment(&self, reference: &str) {
        if let Err(e) = self.attachments.delete(reference).await {
            warn!(reference = %reference, error = %e, "Failed to delete attachment, leaving orphan");
        }
    }
}

/// Id for a new book: the creation time in milliseconds, or one past the
/// highest id in the collection if the clock is behind it.
pub(crate) fn next_id(books: &[Book], now_millis: i64) -> Id {
    books
        .iter()
        .map(|b| b.id.saturating_add(1))
        .max()
        .map_or(now_millis, |floor| floor.max(now_millis))
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;

    #[test]
    fn test_next_id_uses_timestamp() {
        assert_eq!(next_id(&[], 1_700_000_000_000), 1_700_000_000_000);
    }

    #[test]
    fn test_next_id_never_reuses_or_goes_backwards() {
        let books = vec![
            Book::new(101, "A", "B", "C", "D"),
            Book::new(100, "A", "B", "C", "D"),
        ];
        assert_eq!(next_id(&books, 100), 102);
        assert_eq!(next_id(&books, 50), 102);
        assert_eq!(next_id(&books, 500), 500);
    }

    #[tokio::test]
    async fn test_list_and_get() {
        let f = fixture_with(vec![
            Book::new(1, "Dune", "Frank Herbert", "Fiction", "2024-01-01"),
            Book::new(2, "Emma", "Jane Austen", "Classic", "2024-02-02"),
        ]);

        let ids: Vec<Id> = f.service.list().await.iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![1, 2]);

        assert_eq!(f.service.get(2).await.unwrap().name, "Emma");
        assert!(matches!(
            f.service.get(3).await,
            Err(ShelfError::NotFound { .. })
        ));
    }
}
