//! Update a book

use shelf_attachments::Upload;
use shelf_core::{Id, ShelfError, ShelfResult};
use shelf_models::{Book, BookParams};
use tracing::{info, instrument};

use super::set_attributes::apply_params;
use super::BookService;

impl BookService {
    /// Merge params into a book and optionally replace its cover
    ///
    /// The previous cover is removed only once the collection pointing at the
    /// new one has been saved.
    #[instrument(skip(self, params, upload), fields(has_upload = upload.is_some()))]
    pub async fn update(
        &self,
        id: Id,
        params: BookParams,
        upload: Option<Upload>,
    ) -> ShelfResult<Book> {
        let _guard = self.write_lock.lock().await;
        let mut books = self.store.load().await;

        let index = books
            .iter()
            .position(|b| b.id == id)
            .ok_or_else(|| ShelfError::book_not_found(id))?;

        let new_image = match upload {
            Some(upload) => Some(self.store_cover(upload).await?),
            None => None,
        };

        let book = &mut books[index];
        apply_params(book, &params);
        let previous_image = match &new_image {
            Some(reference) => Some(std::mem::replace(&mut book.image, reference.clone())),
            None => None,
        };
        let updated = book.clone();

        if let Err(e) = self.store.save(&books).await {
            if let Some(reference) = &new_image {
                self.discard_attachment(reference).await;
            }
            return Err(e.into());
        }

        if let Some(previous) = previous_image.filter(|p| !p.is_empty()) {
            self.discard_attachment(&previous).await;
        }

        info!(id, "Book updated");
        Ok(updated)
    }
}
