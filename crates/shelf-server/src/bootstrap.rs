//! Start-up: directories, starter data, orphan sweep

use std::sync::Arc;

use anyhow::Context;
use shelf_attachments::{AttachmentConfig, AttachmentService, LocalStorage};
use shelf_core::config::StorageConfig;
use shelf_models::seed::initial_books;
use shelf_services::BookService;
use shelf_store::{JsonFileStore, RecordStore};
use tracing::{info, warn};

/// Wire the record service against the configured directories
pub async fn init_services(config: &StorageConfig) -> anyhow::Result<Arc<BookService>> {
    let attachment_config = AttachmentConfig {
        max_file_size: config.max_upload_size,
        ..AttachmentConfig::default()
    };
    let covers_dir = config.uploads_dir.join(&attachment_config.directory);

    tokio::fs::create_dir_all(&config.data_dir)
        .await
        .with_context(|| format!("creating data directory {}", config.data_dir.display()))?;
    tokio::fs::create_dir_all(&covers_dir)
        .await
        .with_context(|| format!("creating uploads directory {}", covers_dir.display()))?;

    let store = Arc::new(JsonFileStore::new(config.books_file()));
    if config.seed_on_first_run && !store.exists().await {
        let books = initial_books();
        store
            .save(&books)
            .await
            .context("writing starter collection")?;
        info!(count = books.len(), path = %store.path().display(), "Seeded starter collection");
    }

    let attachments = Arc::new(AttachmentService::new(
        Arc::new(LocalStorage::new(&config.uploads_dir)),
        attachment_config,
    ));
    let books = Arc::new(BookService::new(store, attachments));

    match books.sweep_orphans(config.orphan_grace()).await {
        Ok(0) => {}
        Ok(removed) => info!(removed, "Removed orphaned covers"),
        Err(e) => warn!(error = %e, "Orphan sweep failed"),
    }

    Ok(books)
}
