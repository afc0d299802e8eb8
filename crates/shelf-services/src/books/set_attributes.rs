//! Attribute assignment and validation for books

use shelf_core::{Id, ValidationErrors};
use shelf_models::{Book, BookParams, DEFAULT_CATEGORY};

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Fields a new book cannot be created without
pub fn validate_required(params: &BookParams) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();

    if present(&params.name).is_none() {
        errors.add("name", "can't be blank");
    }
    if present(&params.author).is_none() {
        errors.add("author", "can't be blank");
    }
    if present(&params.date).is_none() {
        errors.add("date", "can't be blank");
    }

    errors.into_result()
}

/// Build a book from validated params
pub fn new_book(id: Id, params: &BookParams, image: String) -> Book {
    Book {
        id,
        name: params.name.clone().unwrap_or_default(),
        author: params.author.clone().unwrap_or_default(),
        category: present(&params.category)
            .unwrap_or(DEFAULT_CATEGORY)
            .to_string(),
        date: params.date.clone().unwrap_or_default(),
        image,
        notes: params.notes.clone().unwrap_or_default(),
        extra: Default::default(),
    }
}

/// Merge params into an existing book
///
/// Empty strings do not overwrite `name`, `author`, `category` or `date`.
/// `notes` is taken whenever it was sent, so it can be cleared.
pub fn apply_params(book: &mut Book, params: &BookParams) {
    if let Some(name) = present(&params.name) {
        book.name = name.to_string();
    }
    if let Some(author) = present(&params.author) {
        book.author = author.to_string();
    }
    if let Some(category) = present(&params.category) {
        book.category = category.to_string();
    }
    if let Some(date) = present(&params.date) {
        book.date = date.to_string();
    }
    if let Some(ref notes) = params.notes {
        book.notes = notes.clone();
    }
}
