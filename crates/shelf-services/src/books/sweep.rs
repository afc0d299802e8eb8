//! Orphaned cover cleanup

use std::collections::HashSet;
use std::time::Duration;

use chrono::Utc;
use shelf_core::ShelfResult;
use shelf_models::Book;
use tracing::{info, instrument, warn};

use super::BookService;

impl BookService {
    /// Delete cover files no book references
    ///
    /// Files modified within `grace` are left alone, since they may belong to
    /// a request that has stored its upload but not yet saved the collection.
    /// Nothing is removed while the collection is empty or the store is
    /// degraded: records in a set-aside corrupt document still own their
    /// covers.
    #[instrument(skip(self))]
    pub async fn sweep_orphans(&self, grace: Duration) -> ShelfResult<usize> {
        let _guard = self.write_lock.lock().await;
        let books = self.store.load().await;

        if self.store.is_degraded().await {
            warn!("Collection document has a corrupt copy set aside, skipping orphan sweep");
            return Ok(0);
        }
        if books.is_empty() {
            info!("Collection is empty, skipping orphan sweep");
            return Ok(0);
        }

        let referenced: HashSet<&str> = books.iter().filter_map(Book::image_ref).collect();
        let grace = chrono::Duration::from_std(grace).unwrap_or_else(|_| chrono::Duration::zero());
        let cutoff = Utc::now() - grace;

        let mut removed = 0;
        for file in self.attachments.list().await? {
            if referenced.contains(file.reference.as_str()) {
                continue;
            }
            if file.last_modified.map_or(false, |modified| modified > cutoff) {
                continue;
            }

            match self.attachments.delete(&file.reference).await {
                Ok(true) => removed += 1,
                Ok(false) => {}
                Err(e) => {
                    warn!(reference = %file.reference, error = %e, "Failed to delete orphaned attachment")
                }
            }
        }

        info!(removed, "Orphan sweep finished");
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use std::sync::Arc;

    use shelf_attachments::{AttachmentConfig, AttachmentService, MemoryStorage, Storage};
    use shelf_models::BookParams;
    use shelf_store::MockRecordStore;

    fn params() -> BookParams {
        BookParams::new()
            .with_name("Dune")
            .with_author("Frank Herbert")
            .with_date("2024-01-01")
    }

    #[tokio::test]
    async fn test_sweep_removes_only_unreferenced() {
        let f = fixture();
        let book = f
            .service
            .create(params(), Some(png("kept.png")))
            .await
            .unwrap();
        let orphan = f.service.attachments().store(png("orphan.png")).await.unwrap();

        let removed = f.service.sweep_orphans(Duration::ZERO).await.unwrap();

        assert_eq!(removed, 1);
        assert!(f.service.attachments().exists(&book.image).await.unwrap());
        assert!(!f.storage.exists(&orphan.key).await.unwrap());
    }

    #[tokio::test]
    async fn test_sweep_respects_grace_period() {
        let f = fixture();
        f.service.create(params(), None).await.unwrap();
        let fresh = f.service.attachments().store(png("fresh.png")).await.unwrap();

        let removed = f
            .service
            .sweep_orphans(Duration::from_secs(600))
            .await
            .unwrap();

        assert_eq!(removed, 0);
        assert!(f.storage.exists(&fresh.key).await.unwrap());
    }

    #[tokio::test]
    async fn test_sweep_skips_empty_collection() {
        let f = fixture();
        f.service.attachments().store(png("a.png")).await.unwrap();

        assert_eq!(f.service.sweep_orphans(Duration::ZERO).await.unwrap(), 0);
        assert_eq!(f.storage.len().await, 1);
    }

    #[tokio::test]
    async fn test_sweep_skips_degraded_store() {
        let mut store = MockRecordStore::new();
        store
            .expect_load()
            .returning(|| vec![Book::new(2, "Emma", "Jane Austen", "Classic", "2024-02-02")]);
        store.expect_is_degraded().returning(|| true);

        let storage = Arc::new(MemoryStorage::new());
        let attachments = Arc::new(AttachmentService::new(
            storage.clone(),
            AttachmentConfig::default(),
        ));
        let service = BookService::new(Arc::new(store), attachments);
        let cover = service.attachments().store(png("dune.png")).await.unwrap();

        assert_eq!(service.sweep_orphans(Duration::ZERO).await.unwrap(), 0);
        assert!(storage.exists(&cover.key).await.unwrap());
    }
}
