//! # shelf-attachments
//!
//! Cover image handling for Bookshelf.
//!
//! ## Features
//!
//! - Storage abstraction (local filesystem, in-memory for tests)
//! - Image type and size policy, checked before anything is written
//! - Collision-resistant file naming (`book-<millis>-<random><ext>`)
//! - Idempotent deletion and directory listing for orphan sweeps
//!
//! ## Example
//!
//! ```rust,ignore
//! use shelf_attachments::{AttachmentConfig, AttachmentService, LocalStorage, Upload};
//! use std::sync::Arc;
//!
//! let storage = Arc::new(LocalStorage::new("uploads"));
//! let service = AttachmentService::new(storage, AttachmentConfig::default());
//!
//! let stored = service
//!     .store(Upload::new("cover.png", Some("image/png"), png_bytes))
//!     .await?;
//! assert!(stored.reference.starts_with("/uploads/books/book-"));
//! ```

pub mod model;
pub mod service;
pub mod storage;

pub use model::{AttachmentFile, StoredAttachment, Upload};
pub use service::{
    AllowedImageTypes, AttachmentConfig, AttachmentError, AttachmentResult, AttachmentService,
};
pub use storage::{
    generate_disk_filename, FileMetadata, LocalStorage, MemoryStorage, Storage, StorageError,
    StorageResult, StoredFile,
};
