//! Book Model

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use shelf_core::types::Id;

/// Category assigned when a book is created without one
pub const DEFAULT_CATEGORY: &str = "Fiction";

/// A book record as stored in `books.json`
///
/// Only `id` is required to read a record back. Required fields are enforced
/// when a book is created, not when the collection is loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    pub id: Id,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub date: String,
    /// Public reference to the cover image, empty when there is none
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub notes: String,
    /// Fields this version does not know about, kept so a save never drops them
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Book {
    pub fn new(
        id: Id,
        name: impl Into<String>,
        author: impl Into<String>,
        category: impl Into<String>,
        date: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            author: author.into(),
            category: category.into(),
            date: date.into(),
            image: String::new(),
            notes: String::new(),
            extra: Map::new(),
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = image.into();
        self
    }

    pub fn has_image(&self) -> bool {
        !self.image.is_empty()
    }

    /// The cover reference, if any
    pub fn image_ref(&self) -> Option<&str> {
        if self.image.is_empty() {
            None
        } else {
            Some(&self.image)
        }
    }
}

/// Book fields supplied by a client
///
/// `None` means the field was not sent at all; `Some("")` means it was sent
/// empty. Only `notes` treats the two differently on update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct BookParams {
    pub name: Option<String>,
    pub author: Option<String>,
    pub category: Option<String>,
    pub date: Option<String>,
    pub notes: Option<String>,
}

impl BookParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Set a field by its form name. Unknown names are ignored.
    pub fn set(&mut self, field: &str, value: String) {
        match field {
            "name" => self.name = Some(value),
            "author" => self.author = Some(value),
            "category" => self.category = Some(value),
            "date" => self.date = Some(value),
            "notes" => self.notes = Some(value),
            _ => {}
        }
    }
}
