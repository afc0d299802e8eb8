//! Storage Abstraction
//!
//! Key/value file storage. Keys are relative, `/`-separated paths below the
//! storage root (`books/book-1700000000000-42.png`).

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use thiserror::Error;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::RwLock;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("File not found: {0}")]
    NotFound(String),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Invalid path: {0}")]
    InvalidPath(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// File metadata from storage
#[derive(Debug, Clone)]
pub struct FileMetadata {
    /// File size in bytes
    pub size: u64,
    /// Content type (MIME), guessed from the key
    pub content_type: String,
    /// Last modified time
    pub last_modified: Option<DateTime<Utc>>,
}

/// A key returned by [`Storage::list`]
#[derive(Debug, Clone)]
pub struct StoredFile {
    pub key: String,
    pub metadata: FileMetadata,
}

/// Storage trait - unified interface for storage backends
#[async_trait]
pub trait Storage: Send + Sync {
    /// Store data under a key. The key is only visible once fully written.
    async fn put(&self, key: &str, data: Bytes) -> StorageResult<FileMetadata>;

    /// Delete data by key. Returns whether anything was removed.
    async fn delete(&self, key: &str) -> StorageResult<bool>;

    /// Check if key exists
    async fn exists(&self, key: &str) -> StorageResult<bool>;

    /// List the files directly inside a directory key
    async fn list(&self, dir: &str) -> StorageResult<Vec<StoredFile>>;
}

fn guess_content_type(key: &str) -> String {
    mime_guess::from_path(key)
        .first_or_octet_stream()
        .to_string()
}

fn validate_key(key: &str) -> StorageResult<()> {
    // Prevent directory traversal
    if key.is_empty()
        || key.contains("..")
        || key.contains('\\')
        || key.starts_with('/')
    {
        return Err(StorageError::InvalidPath(key.to_string()));
    }
    Ok(())
}

/// Local filesystem storage
pub struct LocalStorage {
    /// Root directory for storage
    root: PathBuf,
}

impl LocalStorage {
    /// Create a new local storage
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Resolve a key to a full path
    fn resolve_path(&self, key: &str) -> StorageResult<PathBuf> {
        validate_key(key)?;
        Ok(self.root.join(key))
    }

    /// Ensure parent directory exists
    async fn ensure_parent(&self, path: &Path) -> StorageResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        Ok(())
    }

    async fn write_file(path: &Path, data: &[u8]) -> std::io::Result<()> {
        let mut file = fs::File::create(path).await?;
        file.write_all(data).await?;
        file.sync_all().await
    }
}

#[async_trait]
impl Storage for LocalStorage {
    #[instrument(skip(self, data), fields(storage = "local", size = data.len()))]
    async fn put(&self, key: &str, data: Bytes) -> StorageResult<FileMetadata> {
        let path = self.resolve_path(key)?;
        self.ensure_parent(&path).await?;

        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| StorageError::InvalidPath(key.to_string()))?;
        // Dot-prefixed so listings never report a half-written file
        let tmp_path = path.with_file_name(format!(".{}.{}.tmp", file_name, Uuid::new_v4()));

        if let Err(e) = Self::write_file(&tmp_path, &data).await {
            if let Err(cleanup) = fs::remove_file(&tmp_path).await {
                warn!(path = ?tmp_path, error = %cleanup, "Failed to remove partial upload");
            }
            return Err(e.into());
        }
        if let Err(e) = fs::rename(&tmp_path, &path).await {
            let _ = fs::remove_file(&tmp_path).await;
            return Err(e.into());
        }

        debug!(path = ?path, "File stored");

        Ok(FileMetadata {
            size: data.len() as u64,
            content_type: guess_content_type(key),
            last_modified: Some(Utc::now()),
        })
    }

    #[instrument(skip(self), fields(storage = "local"))]
    async fn delete(&self, key: &str) -> StorageResult<bool> {
        let path = self.resolve_path(key)?;

        match fs::remove_file(&path).await {
            Ok(()) => {
                debug!(path = ?path, "File deleted");
                Ok(true)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn exists(&self, key: &str) -> StorageResult<bool> {
        let path = self.resolve_path(key)?;
        Ok(fs::try_exists(&path).await?)
    }

    async fn list(&self, dir: &str) -> StorageResult<Vec<StoredFile>> {
        let path = self.resolve_path(dir)?;

        let mut entries = match fs::read_dir(&path).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut files = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let name = match entry.file_name().into_string() {
                Ok(name) if !name.starts_with('.') => name,
                _ => continue,
            };
            let meta = entry.metadata().await?;
            if !meta.is_file() {
                continue;
            }

            let key = format!("{}/{}", dir.trim_end_matches('/'), name);
            files.push(StoredFile {
                metadata: FileMetadata {
                    size: meta.len(),
                    content_type: guess_content_type(&key),
                    last_modified: meta.modified().ok().map(DateTime::<Utc>::from),
                },
                key,
            });
        }

        files.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(files)
    }
}

/// In-memory storage for testing
pub struct MemoryStorage {
    files: RwLock<HashMap<String, (Bytes, FileMetadata)>>,
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self {
            files: RwLock::new(HashMap::new()),
        }
    }

    pub async fn len(&self) -> usize {
        self.files.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.files.read().await.is_empty()
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn put(&self, key: &str, data: Bytes) -> StorageResult<FileMetadata> {
        validate_key(key)?;

        let metadata = FileMetadata {
            size: data.len() as u64,
            content_type: guess_content_type(key),
            last_modified: Some(Utc::now()),
        };

        let mut files = self.files.write().await;
        files.insert(key.to_string(), (data, metadata.clone()));

        Ok(metadata)
    }

    async fn delete(&self, key: &str) -> StorageResult<bool> {
        validate_key(key)?;
        let mut files = self.files.write().await;
        Ok(files.remove(key).is_some())
    }

    async fn exists(&self, key: &str) -> StorageResult<bool> {
        validate_key(key)?;
        let files = self.files.read().await;
        Ok(files.contains_key(key))
    }

    async fn list(&self, dir: &str) -> StorageResult<Vec<StoredFile>> {
        validate_key(dir)?;
        let prefix = format!("{}/", dir.trim_end_matches('/'));

        let files = self.files.read().await;
        let mut listed: Vec<StoredFile> = files
            .iter()
            .filter(|(key, _)| {
                key.strip_prefix(&prefix)
                    .map_or(false, |rest| !rest.contains('/'))
            })
            .map(|(key, (_, meta))| StoredFile {
                key: key.clone(),
                metadata: meta.clone(),
            })
            .collect();

        listed.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(listed)
    }
}

/// Generate a disk filename for an uploaded cover
///
/// `book-<unix millis>-<random below 1e9><original extension>`; the extension
/// keeps the client's spelling.
pub fn generate_disk_filename(filename: &str) -> String {
    let millis = Utc::now().timestamp_millis();
    let suffix = Uuid::new_v4().as_u128() % 1_000_000_000;
    let ext = Path::new(filename)
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or("");

    if ext.is_empty() {
        format!("book-{}-{}", millis, suffix)
    } else {
        format!("book-{}-{}.{}", millis, suffix, ext)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_storage_put_delete() {
        let storage = MemoryStorage::new();

        let meta = storage
            .put("books/cover.png", Bytes::from("png bytes"))
            .await
            .unwrap();
        assert_eq!(meta.size, 9);
        assert_eq!(meta.content_type, "image/png");
        assert!(storage.exists("books/cover.png").await.unwrap());

        assert!(storage.delete("books/cover.png").await.unwrap());
        assert!(!storage.exists("books/cover.png").await.unwrap());
    }

    #[tokio::test]
    async fn test_memory_storage_delete_missing_is_ok() {
        let storage = MemoryStorage::new();
        assert!(!storage.delete("books/none.png").await.unwrap());
    }

    #[tokio::test]
    async fn test_memory_storage_list_is_shallow() {
        let storage = MemoryStorage::new();
        storage.put("books/a.png", Bytes::from("a")).await.unwrap();
        storage.put("books/b.gif", Bytes::from("b")).await.unwrap();
        storage.put("books/nested/c.png", Bytes::from("c")).await.unwrap();
        storage.put("other/d.png", Bytes::from("d")).await.unwrap();

        let keys: Vec<String> = storage
            .list("books")
            .await
            .unwrap()
            .into_iter()
            .map(|f| f.key)
            .collect();
        assert_eq!(keys, vec!["books/a.png", "books/b.gif"]);
    }

    #[tokio::test]
    async fn test_local_storage_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorage::new(dir.path());

        storage
            .put("books/book-1-2.jpg", Bytes::from("jpeg data"))
            .await
            .unwrap();

        let on_disk = std::fs::read(dir.path().join("books/book-1-2.jpg")).unwrap();
        assert_eq!(on_disk, b"jpeg data");
        assert!(storage.exists("books/book-1-2.jpg").await.unwrap());

        let listed = storage.list("books").await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].key, "books/book-1-2.jpg");
        assert_eq!(listed[0].metadata.size, 9);
        assert!(listed[0].metadata.last_modified.is_some());

        assert!(storage.delete("books/book-1-2.jpg").await.unwrap());
        assert!(!storage.delete("books/book-1-2.jpg").await.unwrap());
    }

    #[tokio::test]
    async fn test_local_storage_leaves_no_temp_files() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorage::new(dir.path());

        storage.put("books/x.png", Bytes::from("x")).await.unwrap();

        let names: Vec<String> = std::fs::read_dir(dir.path().join("books"))
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(names, vec!["x.png"]);
    }

    #[tokio::test]
    async fn test_local_storage_list_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorage::new(dir.path());
        assert!(storage.list("books").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_local_storage_path_traversal() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorage::new(dir.path());

        let result = storage.delete("../../../etc/passwd").await;
        assert!(matches!(result, Err(StorageError::InvalidPath(_))));

        let result = storage.put("/etc/passwd", Bytes::new()).await;
        assert!(matches!(result, Err(StorageError::InvalidPath(_))));
    }

    #[test]
    fn test_generate_disk_filename() {
        let filename = generate_disk_filename("My Cover.PNG");
        assert!(filename.starts_with("book-"));
        assert!(filename.ends_with(".PNG"));
        assert!(!filename.contains(' '));

        let parts: Vec<&str> = filename.trim_end_matches(".PNG").split('-').collect();
        assert_eq!(parts.len(), 3);
        assert!(parts[1].parse::<i64>().is_ok());
        assert!(parts[2].parse::<u64>().unwrap() < 1_000_000_000);

        let no_ext = generate_disk_filename("noext");
        assert!(!no_ext.contains('.'));
    }

    #[test]
    fn test_generated_names_differ() {
        assert_ne!(
            generate_disk_filename("a.png"),
            generate_disk_filename("a.png")
        );
    }
}
