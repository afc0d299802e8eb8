//! JSON file store
//!
//! The collection lives in a single pretty-printed JSON array. Saves write a
//! temporary sibling and rename it over the document, so a reader sees either
//! the old collection or the new one, never a torn write.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use shelf_models::Book;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

use crate::record_store::{RecordStore, StoreResult};

pub struct JsonFileStore {
    path: PathBuf,
    /// Set once the current corrupt document has been copied aside
    quarantined: AtomicBool,
}

impl JsonFileStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            quarantined: AtomicBool::new(false),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn tmp_path(&self) -> PathBuf {
        let name = self
            .path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("books.json");
        self.path
            .with_file_name(format!(".{}.{}.tmp", name, Uuid::new_v4()))
    }

    /// Copy an unparseable document aside so the next save cannot destroy it
    async fn quarantine(&self) {
        if self.quarantined.swap(true, Ordering::SeqCst) {
            return;
        }

        let mut backup = self.path.clone().into_os_string();
        backup.push(format!(".corrupt-{}", chrono::Utc::now().timestamp_millis()));
        let backup = PathBuf::from(backup);

        match fs::copy(&self.path, &backup).await {
            Ok(_) => warn!(backup = %backup.display(), "Corrupt collection document copied aside"),
            Err(e) => {
                self.quarantined.store(false, Ordering::SeqCst);
                error!(error = %e, "Failed to copy corrupt collection document");
            }
        }
    }

    /// Whether a `.corrupt-*` copy of this document sits next to it
    async fn has_corrupt_copy(&self) -> bool {
        let Some(name) = self.path.file_name().and_then(|n| n.to_str()) else {
            return false;
        };
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let prefix = format!("{}.corrupt-", name);

        let mut entries = match fs::read_dir(dir).await {
            Ok(entries) => entries,
            Err(_) => return false,
        };
        while let Ok(Some(entry)) = entries.next_entry().await {
            if entry
                .file_name()
                .to_str()
                .map_or(false, |n| n.starts_with(&prefix))
            {
                return true;
            }
        }
        false
    }

    async fn write_atomic(&self, content: &[u8]) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }

        let tmp = self.tmp_path();
        let result = write_and_rename(&tmp, &self.path, content).await;

        if result.is_err() {
            let _ = fs::remove_file(&tmp).await;
        }
        result
    }
}

async fn write_and_rename(tmp: &Path, target: &Path, content: &[u8]) -> std::io::Result<()> {
    let mut file = fs::File::create(tmp).await?;
    file.write_all(content).await?;
    file.sync_all().await?;
    fs::rename(tmp, target).await
}

#[async_trait]
impl RecordStore for JsonFileStore {
    #[instrument(skip(self), fields(path = %self.path.display()))]
    async fn load(&self) -> Vec<Book> {
        let content = match fs::read(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No collection document yet");
                return Vec::new();
            }
            Err(e) => {
                error!(error = %e, "Failed to read collection document");
                return Vec::new();
            }
        };

        if content.iter().all(u8::is_ascii_whitespace) {
            return Vec::new();
        }

        match serde_json::from_slice::<Vec<Book>>(&content) {
            Ok(books) => books,
            Err(e) => {
                warn!(error = %e, "Collection document is malformed, treating it as empty");
                self.quarantine().await;
                Vec::new()
            }
        }
    }

    #[instrument(skip(self, books), fields(path = %self.path.display(), count = books.len()))]
    async fn save(&self, books: &[Book]) -> StoreResult<()> {
        let content = serde_json::to_string_pretty(books)?;

        if let Err(e) = self.write_atomic(content.as_bytes()).await {
            error!(error = %e, "Failed to write collection document");
            return Err(e.into());
        }

        self.quarantined.store(false, Ordering::SeqCst);
        info!("Collection saved");
        Ok(())
    }

    async fn exists(&self) -> bool {
        fs::try_exists(&self.path).await.unwrap_or(false)
    }

    async fn is_degraded(&self) -> bool {
        self.quarantined.load(Ordering::SeqCst) || self.has_corrupt_copy().await
    }
}
