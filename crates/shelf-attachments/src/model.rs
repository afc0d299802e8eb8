//! Attachment Model

use bytes::Bytes;
use chrono::{DateTime, Utc};

/// A file received from a client, not yet written anywhere
#[derive(Debug, Clone)]
pub struct Upload {
    /// Filename as sent by the client
    pub filename: String,
    /// Declared MIME type, if the client sent one
    pub content_type: Option<String>,
    /// File contents
    pub data: Bytes,
}

impl Upload {
    pub fn new(
        filename: impl Into<String>,
        content_type: Option<&str>,
        data: impl Into<Bytes>,
    ) -> Self {
        Self {
            filename: filename.into(),
            content_type: content_type.map(str::to_string),
            data: data.into(),
        }
    }

    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }
}

/// Result of a successful store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredAttachment {
    /// Public path recorded on the book, e.g. `/uploads/books/book-1-2.png`
    pub reference: String,
    /// Storage key relative to the uploads root, e.g. `books/book-1-2.png`
    pub key: String,
    pub size: u64,
    pub content_type: String,
}

/// An attachment found on disk
#[derive(Debug, Clone)]
pub struct AttachmentFile {
    pub reference: String,
    pub size: u64,
    pub last_modified: Option<DateTime<Utc>>,
}
