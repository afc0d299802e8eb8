//! Create a book

use chrono::Utc;
use shelf_attachments::Upload;
use shelf_core::ShelfResult;
use shelf_models::{Book, BookParams};
use tracing::{info, instrument};

use super::set_attributes::{new_book, validate_required};
use super::{next_id, BookService};

impl BookService {
    /// Create a book, storing its cover first when one is uploaded
    #[instrument(skip(self, params, upload), fields(has_upload = upload.is_some()))]
    pub async fn create(&self, params: BookParams, upload: Option<Upload>) -> ShelfResult<Book> {
        validate_required(&params)?;

        let image = match upload {
            Some(upload) => self.store_cover(upload).await?,
            None => String::new(),
        };

        let _guard = self.write_lock.lock().await;
        let mut books = self.store.load().await;

        let book = new_book(
            next_id(&books, Utc::now().timestamp_millis()),
            &params,
            image,
        );
        books.push(book.clone());

        if let Err(e) = self.store.save(&books).await {
            if let Some(reference) = book.image_ref() {
                self.discard_attachment(reference).await;
            }
            return Err(e.into());
        }

        info!(id = book.id, name = %book.name, "Book created");
        Ok(book)
    }
}
