//! In-memory record store for testing

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use shelf_models::Book;
use tokio::sync::RwLock;

use crate::record_store::{RecordStore, StoreResult};

#[derive(Default)]
pub struct MemoryRecordStore {
    books: RwLock<Option<Vec<Book>>>,
    saves: AtomicUsize,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_books(books: Vec<Book>) -> Self {
        Self {
            books: RwLock::new(Some(books)),
            saves: AtomicUsize::new(0),
        }
    }

    /// Number of successful saves so far
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn load(&self) -> Vec<Book> {
        self.books.read().await.clone().unwrap_or_default()
    }

    async fn save(&self, books: &[Book]) -> StoreResult<()> {
        *self.books.write().await = Some(books.to_vec());
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn exists(&self) -> bool {
        self.books.read().await.is_some()
    }

    async fn is_degraded(&self) -> bool {
        false
    }
}
