//! Core error types for Bookshelf
//!
//! Every crate converts its local failures into [`ShelfError`] at its public
//! boundary so the API layer only has one taxonomy to map.

use std::collections::BTreeMap;
use thiserror::Error;

use crate::types::Id;

/// Core error type for all Bookshelf operations
#[derive(Error, Debug)]
pub enum ShelfError {
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("Not found: {entity} with id={id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Unsupported media type: {0}")]
    UnsupportedMediaType(String),

    #[error("Payload too large: {size} bytes (max: {max} bytes)")]
    PayloadTooLarge { size: u64, max: u64 },

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ShelfError {
    pub fn book_not_found(id: Id) -> Self {
        ShelfError::NotFound {
            entity: "Book",
            id: id.to_string(),
        }
    }

    pub fn persistence(msg: impl Into<String>) -> Self {
        ShelfError::Persistence(msg.into())
    }

    pub fn status_code(&self) -> u16 {
        match self {
            ShelfError::Validation(_) => 400,
            ShelfError::NotFound { .. } => 404,
            ShelfError::PayloadTooLarge { .. } => 413,
            ShelfError::UnsupportedMediaType(_) => 415,
            ShelfError::Persistence(_) | ShelfError::Internal(_) => 500,
        }
    }
}

/// Field-level validation errors
#[derive(Error, Debug, Default, Clone, PartialEq, Eq)]
#[error("Validation errors: {errors:?}")]
pub struct ValidationErrors {
    /// field_name -> messages, ordered by field name
    pub errors: BTreeMap<String, Vec<String>>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors
            .entry(field.into())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn has_error(&self, field: &str) -> bool {
        self.errors.contains_key(field)
    }

    pub fn full_messages(&self) -> Vec<String> {
        let mut messages = Vec::new();
        for (field, field_messages) in &self.errors {
            for msg in field_messages {
                messages.push(format!("{} {}", field, msg));
            }
        }
        messages
    }

    /// `Ok(())` when empty, otherwise the collected errors
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

/// Standard Result type for Bookshelf operations
pub type ShelfResult<T> = Result<T, ShelfError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_errors_collect() {
        let mut errors = ValidationErrors::new();
        assert!(errors.is_empty());

        errors.add("name", "can't be blank");
        errors.add("author", "can't be blank");

        assert!(errors.has_error("name"));
        assert!(!errors.has_error("date"));
        assert_eq!(
            errors.full_messages(),
            vec!["author can't be blank", "name can't be blank"]
        );
        assert!(errors.into_result().is_err());
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(ShelfError::book_not_found(7).status_code(), 404);
        assert_eq!(
            ShelfError::Validation(ValidationErrors::new()).status_code(),
            400
        );
        assert_eq!(
            ShelfError::UnsupportedMediaType("text/plain".into()).status_code(),
            415
        );
        assert_eq!(
            ShelfError::PayloadTooLarge { size: 10, max: 5 }.status_code(),
            413
        );
        assert_eq!(ShelfError::persistence("disk full").status_code(), 500);
    }

    #[test]
    fn test_not_found_message() {
        let err = ShelfError::book_not_found(12);
        assert_eq!(err.to_string(), "Not found: Book with id=12");
    }
}
