//! Attachment Service
//!
//! Applies the cover image policy on top of a [`Storage`] backend and maps
//! between storage keys and the public references recorded on books.

use std::path::Path;
use std::sync::Arc;

use shelf_core::config::MAX_UPLOAD_SIZE;
use shelf_core::ShelfError;
use thiserror::Error;
use tracing::{debug, info, instrument};

use crate::model::{AttachmentFile, StoredAttachment, Upload};
use crate::storage::{generate_disk_filename, Storage, StorageError};

/// Service errors
#[derive(Debug, Error)]
pub enum AttachmentError {
    #[error("Storage error: {0}")]
    StorageError(#[from] StorageError),
    #[error("Only image files are allowed! ({0})")]
    UnsupportedMediaType(String),
    #[error("File too large: {size} bytes (max: {max} bytes)")]
    FileTooLarge { size: u64, max: u64 },
    #[error("Invalid attachment reference: {0}")]
    InvalidReference(String),
}

pub type AttachmentResult<T> = Result<T, AttachmentError>;

impl From<AttachmentError> for ShelfError {
    fn from(err: AttachmentError) -> Self {
        match err {
            AttachmentError::UnsupportedMediaType(reason) => {
                ShelfError::UnsupportedMediaType(reason)
            }
            AttachmentError::FileTooLarge { size, max } => {
                ShelfError::PayloadTooLarge { size, max }
            }
            AttachmentError::InvalidReference(reference) => {
                ShelfError::Internal(format!("Invalid attachment reference: {}", reference))
            }
            AttachmentError::StorageError(e) => ShelfError::Persistence(e.to_string()),
        }
    }
}

/// Accepted image types
///
/// An upload passes only if both its extension and its declared MIME subtype
/// are in the list.
#[derive(Debug, Clone)]
pub struct AllowedImageTypes {
    /// Lowercase names, used both as extensions and as `image/*` subtypes
    pub types: Vec<String>,
}

impl Default for AllowedImageTypes {
    fn default() -> Self {
        Self {
            types: ["jpeg", "jpg", "png", "gif", "webp"]
                .iter()
                .map(|t| t.to_string())
                .collect(),
        }
    }
}

impl AllowedImageTypes {
    fn contains(&self, token: &str) -> bool {
        let token = token.to_ascii_lowercase();
        self.types.iter().any(|t| *t == token)
    }

    /// Check a filename's extension
    pub fn is_allowed_extension(&self, filename: &str) -> bool {
        Path::new(filename)
            .extension()
            .and_then(|e| e.to_str())
            .map_or(false, |ext| self.contains(ext))
    }

    /// Check a declared content type such as `image/png`
    pub fn is_allowed_content_type(&self, content_type: &str) -> bool {
        match content_type.trim().parse::<mime::Mime>() {
            Ok(m) => m.type_() == mime::IMAGE && self.contains(m.subtype().as_str()),
            Err(_) => false,
        }
    }
}

/// Attachment service configuration
#[derive(Debug, Clone)]
pub struct AttachmentConfig {
    pub allowed_types: AllowedImageTypes,
    /// Maximum file size in bytes
    pub max_file_size: u64,
    /// URL prefix the storage root is served under
    pub public_prefix: String,
    /// Directory key covers are stored in
    pub directory: String,
}

impl Default for AttachmentConfig {
    fn default() -> Self {
        Self {
            allowed_types: AllowedImageTypes::default(),
            max_file_size: MAX_UPLOAD_SIZE,
            public_prefix: "/uploads".to_string(),
            directory: "books".to_string(),
        }
    }
}

/// Attachment service
pub struct AttachmentService {
    storage: Arc<dyn Storage>,
    config: AttachmentConfig,
}

impl AttachmentService {
    pub fn new(storage: Arc<dyn Storage>, config: AttachmentConfig) -> Self {
        Self { storage, config }
    }

    /// Check filename and declared content type without touching storage
    pub fn validate(&self, filename: &str, content_type: Option<&str>) -> AttachmentResult<()> {
        let allowed = &self.config.allowed_types;

        if !allowed.is_allowed_extension(filename) {
            return Err(AttachmentError::UnsupportedMediaType(format!(
                "extension of '{}' is not accepted",
                filename
            )));
        }

        match content_type {
            Some(ct) if allowed.is_allowed_content_type(ct) => Ok(()),
            Some(ct) => Err(AttachmentError::UnsupportedMediaType(format!(
                "content type '{}' is not accepted",
                ct
            ))),
            None => Err(AttachmentError::UnsupportedMediaType(
                "no content type declared".to_string(),
            )),
        }
    }

    /// Check type and size of an upload
    pub fn check(&self, upload: &Upload) -> AttachmentResult<()> {
        self.validate(&upload.filename, upload.content_type.as_deref())?;

        let size = upload.size();
        if size > self.config.max_file_size {
            return Err(AttachmentError::FileTooLarge {
                size,
                max: self.config.max_file_size,
            });
        }
        Ok(())
    }

    /// Validate and persist an upload under a fresh name
    #[instrument(skip(self, upload), fields(filename = %upload.filename, size = upload.size()))]
    pub async fn store(&self, upload: Upload) -> AttachmentResult<StoredAttachment> {
        self.check(&upload)?;

        let disk_filename = generate_disk_filename(&upload.filename);
        let key = format!("{}/{}", self.config.directory, disk_filename);

        let metadata = self.storage.put(&key, upload.data).await?;
        let reference = self.reference_for(&key);

        info!(reference = %reference, size = metadata.size, "Attachment stored");

        Ok(StoredAttachment {
            reference,
            key,
            size: metadata.size,
            content_type: upload
                .content_type
                .unwrap_or(metadata.content_type),
        })
    }

    /// Delete the file behind a reference. Missing files are not an error.
    #[instrument(skip(self))]
    pub async fn delete(&self, reference: &str) -> AttachmentResult<bool> {
        let key = self.key_for(reference)?;
        let removed = self.storage.delete(&key).await?;

        if removed {
            info!(reference = %reference, "Attachment deleted");
        } else {
            debug!(reference = %reference, "Attachment already absent");
        }

        Ok(removed)
    }

    pub async fn exists(&self, reference: &str) -> AttachmentResult<bool> {
        let key = self.key_for(reference)?;
        Ok(self.storage.exists(&key).await?)
    }

    /// All stored covers, including ones no book points at
    pub async fn list(&self) -> AttachmentResult<Vec<AttachmentFile>> {
        let files = self.storage.list(&self.config.directory).await?;

        Ok(files
            .into_iter()
            .filter(|f| {
                f.key
                    .rsplit('/')
                    .next()
                    .map_or(false, |name| name.starts_with("book-"))
            })
            .map(|f| AttachmentFile {
                reference: self.reference_for(&f.key),
                size: f.metadata.size,
                last_modified: f.metadata.last_modified,
            })
            .collect())
    }

    /// Public reference for a storage key
    pub fn reference_for(&self, key: &str) -> String {
        format!("{}/{}", self.config.public_prefix.trim_end_matches('/'), key)
    }

    /// Storage key for a public reference
    ///
    /// Only references inside the cover directory are accepted.
    pub fn key_for(&self, reference: &str) -> AttachmentResult<String> {
        let prefix = format!(
            "{}/{}/",
            self.config.public_prefix.trim_end_matches('/'),
            self.config.directory
        );

        match reference.strip_prefix(&prefix) {
            Some(name) if !name.is_empty() && !name.contains('/') && !name.contains("..") => {
                Ok(format!("{}/{}", self.config.directory, name))
            }
            _ => Err(AttachmentError::InvalidReference(reference.to_string())),
        }
    }
}
