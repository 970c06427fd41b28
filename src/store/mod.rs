//! Per-category vector collections.
//!
//! Layout on disk: one directory per category under the persist root, each
//! holding a single SQLite database. Re-ingesting a category replaces only
//! that category's directory.

mod sqlite;

pub use sqlite::SqliteCollection;

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const COLLECTION_DB_FILE: &str = "chunks.db";

/// A document chunk as written at ingest time. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentChunk {
    pub text: String,
    /// Path of the file the chunk came from.
    pub source: String,
    pub category: Option<String>,
    /// Position of the chunk within its source file.
    pub chunk_index: usize,
}

/// One nearest-neighbor search result.
#[derive(Debug, Clone)]
pub struct SearchHit {
    pub chunk: DocumentChunk,
    /// Cosine similarity, higher is closer.
    pub score: f32,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("collection not found: {0}")]
    NotFound(String),
    #[error("store error: {0}")]
    Sqlite(#[from] sqlx::Error),
    #[error("store io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Storage backend for one collection.
#[async_trait]
pub trait VectorCollection: Send + Sync {
    /// Insert chunks with their embeddings in one transaction.
    async fn insert_batch(
        &self,
        items: Vec<(DocumentChunk, Vec<f32>)>,
    ) -> Result<(), StoreError>;

    /// Top-`limit` chunks by cosine similarity, nearest first. Equal scores
    /// keep insertion order.
    async fn search(
        &self,
        query_embedding: &[f32],
        limit: usize,
    ) -> Result<Vec<SearchHit>, StoreError>;

    async fn count(&self) -> Result<usize, StoreError>;

    /// Embedding model the collection was built with, if recorded.
    async fn embedding_model(&self) -> Result<Option<String>, StoreError>;

    async fn set_embedding_model(&self, model: &str) -> Result<(), StoreError>;
}

pub fn collection_dir(persist_dir: &Path, key: &str) -> PathBuf {
    persist_dir.join(key)
}

pub fn collection_db_path(persist_dir: &Path, key: &str) -> PathBuf {
    collection_dir(persist_dir, key).join(COLLECTION_DB_FILE)
}

pub fn collection_exists(persist_dir: &Path, key: &str) -> bool {
    collection_db_path(persist_dir, key).exists()
}
