//! SQLite-backed collection: chunk rows with embedding BLOBs and brute-force
//! cosine similarity search. Collections are small enough (one category of a
//! counseling corpus) that a linear scan beats maintaining an ANN index.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use super::{
    collection_db_path, collection_dir, DocumentChunk, SearchHit, StoreError, VectorCollection,
};

#[derive(Debug)]
pub struct SqliteCollection {
    pool: SqlitePool,
    #[allow(dead_code)]
    db_path: PathBuf,
}

impl SqliteCollection {
    /// Opens an existing collection for querying. Fails with
    /// `StoreError::NotFound` when the category has never been ingested.
    pub async fn open(persist_dir: &Path, key: &str) -> Result<Self, StoreError> {
        let db_path = collection_db_path(persist_dir, key);
        if !db_path.exists() {
            return Err(StoreError::NotFound(key.to_string()));
        }
        Self::connect(db_path, false).await
    }

    /// Creates a fresh collection for ingestion, replacing any previous data
    /// for the same key. Only this key's directory is touched.
    pub async fn create(persist_dir: &Path, key: &str) -> Result<Self, StoreError> {
        let dir = collection_dir(persist_dir, key);
        if dir.exists() {
            std::fs::remove_dir_all(&dir)?;
        }
        std::fs::create_dir_all(&dir)?;

        let store = Self::connect(collection_db_path(persist_dir, key), true).await?;
        store.init_schema().await?;
        Ok(store)
    }

    async fn connect(db_path: PathBuf, create: bool) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::new()
            .filename(&db_path)
            .create_if_missing(create)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal);

        let pool = SqlitePoolOptions::new()
            .min_connections(1)
            .max_connections(4)
            .connect_with(options)
            .await?;

        Ok(Self { pool, db_path })
    }

    async fn init_schema(&self) -> Result<(), StoreError> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS chunks (
                chunk_id TEXT PRIMARY KEY,
                text TEXT NOT NULL,
                source TEXT NOT NULL DEFAULT '',
                category TEXT,
                chunk_index INTEGER NOT NULL DEFAULT 0,
                embedding BLOB NOT NULL,
                created_at TEXT NOT NULL DEFAULT (STRFTIME('%Y-%m-%dT%H:%M:%fZ', 'now'))
            )",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS collection_meta (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL DEFAULT (STRFTIME('%Y-%m-%dT%H:%M:%fZ', 'now'))
            )",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    fn serialize_embedding(embedding: &[f32]) -> Vec<u8> {
        embedding.iter().flat_map(|f| f.to_le_bytes()).collect()
    }

    fn deserialize_embedding(bytes: &[u8]) -> Vec<f32> {
        bytes
            .chunks_exact(4)
            .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
            .collect()
    }

    fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
        if a.len() != b.len() || a.is_empty() {
            return 0.0;
        }

        let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
        let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
        let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
        let denom = norm_a * norm_b;

        if denom <= f32::EPSILON {
            0.0
        } else {
            dot / denom
        }
    }

    fn row_to_chunk(row: &sqlx::sqlite::SqliteRow) -> DocumentChunk {
        let chunk_index: i64 = row.get("chunk_index");
        DocumentChunk {
            text: row.get("text"),
            source: row.get("source"),
            category: row.get("category"),
            chunk_index: chunk_index as usize,
        }
    }
}

#[async_trait]
impl VectorCollection for SqliteCollection {
    async fn insert_batch(
        &self,
        items: Vec<(DocumentChunk, Vec<f32>)>,
    ) -> Result<(), StoreError> {
        if items.is_empty() {
            return Ok(());
        }

        let mut tx = self.pool.begin().await?;

        for (chunk, embedding) in &items {
            let blob = Self::serialize_embedding(embedding);
            sqlx::query(
                "INSERT INTO chunks (chunk_id, text, source, category, chunk_index, embedding)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )
            .bind(Uuid::new_v4().to_string())
            .bind(&chunk.text)
            .bind(&chunk.source)
            .bind(&chunk.category)
            .bind(chunk.chunk_index as i64)
            .bind(&blob)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn search(
        &self,
        query_embedding: &[f32],
        limit: usize,
    ) -> Result<Vec<SearchHit>, StoreError> {
        // rowid order makes the stable sort below break score ties by
        // insertion order.
        let rows = sqlx::query(
            "SELECT text, source, category, chunk_index, embedding
             FROM chunks ORDER BY rowid ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut scored: Vec<SearchHit> = rows
            .iter()
            .map(|row| {
                let embedding_bytes: Vec<u8> = row.get("embedding");
                let stored = Self::deserialize_embedding(&embedding_bytes);
                SearchHit {
                    chunk: Self::row_to_chunk(row),
                    score: Self::cosine_similarity(query_embedding, &stored),
                }
            })
            .collect();

        scored.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        scored.truncate(limit);

        Ok(scored)
    }

    async fn count(&self) -> Result<usize, StoreError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM chunks")
            .fetch_one(&self.pool)
            .await?;
        Ok(count as usize)
    }

    async fn embedding_model(&self) -> Result<Option<String>, StoreError> {
        let value: Option<String> =
            sqlx::query_scalar("SELECT value FROM collection_meta WHERE key = 'embedding_model'")
                .fetch_optional(&self.pool)
                .await?;
        Ok(value)
    }

    async fn set_embedding_model(&self, model: &str) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT OR REPLACE INTO collection_meta (key, value, updated_at)
             VALUES ('embedding_model', ?1, STRFTIME('%Y-%m-%dT%H:%M:%fZ', 'now'))",
        )
        .bind(model)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
