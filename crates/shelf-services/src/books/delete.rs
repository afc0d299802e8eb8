//! Delete a book

use shelf_core::{Id, ShelfError, ShelfResult};
use shelf_models::Book;
use tracing::{info, instrument};

use super::BookService;

impl BookService {
    /// Remove a book, then its cover. Returns the removed record.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: Id) -> ShelfResult<Book> {
        let _guard = self.write_lock.lock().await;
        let mut books = self.store.load().await;

        let index = books
            .iter()
            .position(|b| b.id == id)
            .ok_or_else(|| ShelfError::book_not_found(id))?;
        let removed = books.remove(index);

        self.store.save(&books).await?;

        if let Some(reference) = removed.image_ref() {
            self.discard_attachment(reference).await;
        }

        info!(id, "Book deleted");
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use shelf_store::RecordStore;

    use super::super::test_support::*;
    use super::*;
    use shelf_models::BookParams;

    #[tokio::test]
    async fn test_delete_removes_record_and_cover() {
        let f = fixture();
        let book = f
            .service
            .create(
                BookParams::new()
                    .with_name("Dune")
                    .with_author("Frank Herbert")
                    .with_date("2024-01-01"),
                Some(png("cover.png")),
            )
            .await
            .unwrap();

        let removed = f.service.delete(book.id).await.unwrap();

        assert_eq!(removed, book);
        assert!(matches!(
            f.service.get(book.id).await,
            Err(ShelfError::NotFound { .. })
        ));
        assert!(f.storage.is_empty().await);
    }

    #[tokio::test]
    async fn test_delete_missing_book() {
        let f = fixture_with(vec![Book::new(1, "A", "B", "C", "D")]);

        assert!(matches!(
            f.service.delete(2).await,
            Err(ShelfError::NotFound { .. })
        ));
        assert_eq!(f.store.load().await.len(), 1);
        assert_eq!(f.store.save_count(), 0);
    }

    #[tokio::test]
    async fn test_delete_with_missing_cover_file_succeeds() {
        let f = fixture_with(vec![
            Book::new(1, "A", "B", "C", "D").with_image("/uploads/books/book-1-1.png"),
            Book::new(2, "E", "F", "G", "H").with_image("/images/legacy.png"),
        ]);

        assert!(f.service.delete(1).await.is_ok());
        assert!(f.service.delete(2).await.is_ok());
        assert!(f.service.list().await.is_empty());
    }

    #[tokio::test]
    async fn test_delete_preserves_order() {
        let f = fixture_with(vec![
            Book::new(1, "A", "B", "C", "D"),
            Book::new(2, "A", "B", "C", "D"),
            Book::new(3, "A", "B", "C", "D"),
        ]);

        f.service.delete(2).await.unwrap();

        let ids: Vec<_> = f.service.list().await.iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }
}
