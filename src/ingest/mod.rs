//! Offline document ingestion.
//!
//! Walks a corpus directory, splits supported files into overlapping chunks,
//! embeds them, and writes one collection per category. Runs as a separate
//! binary, never concurrently with serving against the same persist root.

pub mod chunker;
pub mod loader;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;
use walkdir::WalkDir;

use crate::core::config::{CategoryMode, Settings};
use crate::embed::{EmbedError, Embedder};
use crate::store::{DocumentChunk, SqliteCollection, StoreError, VectorCollection};

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("source directory {0} does not exist")]
    MissingSourceDir(String),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Embed(#[from] EmbedError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Summary of one ingestion run.
#[derive(Debug, Default)]
pub struct IngestReport {
    pub files_loaded: usize,
    pub files_skipped_unsupported: usize,
    pub files_skipped_unreadable: usize,
    pub chunks_written: usize,
    /// Chunk count per collection key.
    pub collections: BTreeMap<String, usize>,
}

pub struct IngestPipeline {
    settings: Settings,
    embedder: Arc<dyn Embedder>,
}

impl IngestPipeline {
    pub fn new(settings: Settings, embedder: Arc<dyn Embedder>) -> Self {
        Self { settings, embedder }
    }

    /// Ingests `source_dir` into per-category collections under `persist_dir`.
    ///
    /// Re-running with identical input replaces each target collection, so the
    /// run is idempotent. Unsupported or unreadable files are skipped and
    /// counted, never fatal.
    pub async fn run(
        &self,
        source_dir: &Path,
        persist_dir: &Path,
    ) -> Result<IngestReport, IngestError> {
        if !source_dir.is_dir() {
            return Err(IngestError::MissingSourceDir(
                source_dir.display().to_string(),
            ));
        }

        let mut report = IngestReport::default();
        let grouped = self.group_files(source_dir)?;

        for (category, files) in grouped {
            let chunks = self.chunk_category(&category, &files, &mut report);

            let collection = SqliteCollection::create(persist_dir, &category).await?;
            collection
                .set_embedding_model(self.embedder.model_id())
                .await?;

            let written = self.embed_and_insert(&collection, chunks).await?;
            tracing::info!(category = %category, chunks = written, "collection written");

            report.chunks_written += written;
            report.collections.insert(category, written);
        }

        Ok(report)
    }

    /// Groups corpus files by collection key according to the category mode.
    fn group_files(
        &self,
        source_dir: &Path,
    ) -> Result<BTreeMap<String, Vec<PathBuf>>, IngestError> {
        let mut grouped: BTreeMap<String, Vec<PathBuf>> = BTreeMap::new();
        let default_key = self.settings.ingest.default_collection.clone();

        match self.settings.ingest.category_mode {
            CategoryMode::Single => {
                let files = collect_files(source_dir);
                grouped.insert(default_key, files);
            }
            CategoryMode::PerSubdirectory => {
                for entry in std::fs::read_dir(source_dir)? {
                    let entry = entry?;
                    let path = entry.path();
                    if path.is_dir() {
                        let category = entry.file_name().to_string_lossy().to_string();
                        grouped.insert(category, collect_files(&path));
                    } else {
                        // Loose files at the corpus root still get indexed.
                        grouped
                            .entry(default_key.clone())
                            .or_default()
                            .push(path);
                    }
                }
            }
        }

        Ok(grouped)
    }

    fn chunk_category(
        &self,
        category: &str,
        files: &[PathBuf],
        report: &mut IngestReport,
    ) -> Vec<DocumentChunk> {
        let mut chunks = Vec::new();

        for path in files {
            let text = match loader::load_file(path) {
                Ok(text) => text,
                Err(loader::LoadError::UnsupportedFileType(p)) => {
                    tracing::warn!("skipping unsupported file: {}", p);
                    report.files_skipped_unsupported += 1;
                    continue;
                }
                Err(loader::LoadError::ReadError(p, e)) => {
                    tracing::warn!("skipping unreadable file {}: {}", p, e);
                    report.files_skipped_unreadable += 1;
                    continue;
                }
            };

            let pieces = chunker::split_text(
                &text,
                self.settings.chunking.chunk_size,
                self.settings.chunking.chunk_overlap,
            );

            tracing::debug!(file = %path.display(), chunks = pieces.len(), "file chunked");
            report.files_loaded += 1;

            chunks.extend(pieces.into_iter().enumerate().map(|(i, text)| DocumentChunk {
                text,
                source: path.display().to_string(),
                category: Some(category.to_string()),
                chunk_index: i,
            }));
        }

        chunks
    }

    async fn embed_and_insert(
        &self,
        collection: &SqliteCollection,
        chunks: Vec<DocumentChunk>,
    ) -> Result<usize, IngestError> {
        let mut written = 0;

        for batch in chunks.chunks(self.settings.embedding.batch_size) {
            let texts: Vec<String> = batch.iter().map(|c| c.text.clone()).collect();
            let embeddings = self.embedder.embed(&texts).await?;

            let items: Vec<(DocumentChunk, Vec<f32>)> =
                batch.iter().cloned().zip(embeddings).collect();
            written += items.len();
            collection.insert_batch(items).await?;
        }

        Ok(written)
    }
}

fn collect_files(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .collect();
    files.sort();
    files
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embed::EmbedError;
    use async_trait::async_trait;
    use std::fs;

    /// Deterministic stand-in for a real embedding model: hashes the text into
    /// a small fixed-dimension vector.
    struct HashEmbedder;

    #[async_trait]
    impl Embedder for HashEmbedder {
        fn model_id(&self) -> &str {
            "hash-embedder"
        }

        async fn embed(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>, EmbedError> {
            Ok(inputs
                .iter()
                .map(|text| {
                    let mut v = [0.0f32; 4];
                    for (i, b) in text.bytes().enumerate() {
                        v[i % 4] += b as f32 / 255.0;
                    }
                    v.to_vec()
                })
                .collect())
        }
    }

    fn pipeline() -> IngestPipeline {
        let mut settings = Settings::default();
        settings.chunking.chunk_size = 100;
        settings.chunking.chunk_overlap = 20;
        IngestPipeline::new(settings, Arc::new(HashEmbedder))
    }

    #[tokio::test]
    async fn per_subdirectory_creates_scoped_collections() {
        let source = tempfile::tempdir().unwrap();
        let persist = tempfile::tempdir().unwrap();

        fs::create_dir(source.path().join("주거")).unwrap();
        fs::write(source.path().join("주거/guide.txt"), "전세 보증금 지원 안내.").unwrap();
        fs::create_dir(source.path().join("금융")).unwrap();
        fs::write(source.path().join("금융/loans.txt"), "청년 대출 상품 정리.").unwrap();

        let report = pipeline().run(source.path(), persist.path()).await.unwrap();

        assert_eq!(report.files_loaded, 2);
        assert_eq!(report.collections.len(), 2);
        assert!(report.collections["주거"] >= 1);
        assert!(crate::store::collection_exists(persist.path(), "주거"));
        assert!(crate::store::collection_exists(persist.path(), "금융"));
    }

    #[tokio::test]
    async fn unsupported_and_unreadable_files_are_skipped() {
        let source = tempfile::tempdir().unwrap();
        let persist = tempfile::tempdir().unwrap();

        fs::create_dir(source.path().join("주거")).unwrap();
        fs::write(source.path().join("주거/guide.txt"), "지원 내용.").unwrap();
        fs::write(source.path().join("주거/scan.pdf"), [0u8, 1, 2]).unwrap();

        let report = pipeline().run(source.path(), persist.path()).await.unwrap();

        assert_eq!(report.files_loaded, 1);
        assert_eq!(report.files_skipped_unsupported, 1);
        assert_eq!(report.chunks_written, report.collections["주거"]);
    }

    #[tokio::test]
    async fn rerun_is_idempotent() {
        let source = tempfile::tempdir().unwrap();
        let persist = tempfile::tempdir().unwrap();

        fs::create_dir(source.path().join("통신")).unwrap();
        fs::write(
            source.path().join("통신/plans.txt"),
            "알뜰폰 요금제 설명. ".repeat(30),
        )
        .unwrap();

        let first = pipeline().run(source.path(), persist.path()).await.unwrap();
        let second = pipeline().run(source.path(), persist.path()).await.unwrap();

        assert_eq!(first.chunks_written, second.chunks_written);

        let store = SqliteCollection::open(persist.path(), "통신").await.unwrap();
        assert_eq!(store.count().await.unwrap(), second.chunks_written);
    }

    #[tokio::test]
    async fn empty_directory_yields_empty_collection() {
        let source = tempfile::tempdir().unwrap();
        let persist = tempfile::tempdir().unwrap();
        fs::create_dir(source.path().join("보험")).unwrap();

        let report = pipeline().run(source.path(), persist.path()).await.unwrap();

        assert_eq!(report.collections["보험"], 0);
        let store = SqliteCollection::open(persist.path(), "보험").await.unwrap();
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn single_mode_uses_default_collection() {
        let source = tempfile::tempdir().unwrap();
        let persist = tempfile::tempdir().unwrap();
        fs::write(source.path().join("faq.txt"), "자주 묻는 질문 모음.").unwrap();

        let mut settings = Settings::default();
        settings.ingest.category_mode = CategoryMode::Single;
        let pipeline = IngestPipeline::new(settings, Arc::new(HashEmbedder));

        let report = pipeline.run(source.path(), persist.path()).await.unwrap();
        assert!(report.collections.contains_key("general"));
        assert!(crate::store::collection_exists(persist.path(), "general"));
    }

    #[tokio::test]
    async fn records_model_fingerprint() {
        let source = tempfile::tempdir().unwrap();
        let persist = tempfile::tempdir().unwrap();
        fs::create_dir(source.path().join("주거")).unwrap();
        fs::write(source.path().join("주거/a.txt"), "내용").unwrap();

        pipeline().run(source.path(), persist.path()).await.unwrap();

        let store = SqliteCollection::open(persist.path(), "주거").await.unwrap();
        assert_eq!(
            store.embedding_model().await.unwrap().as_deref(),
            Some("hash-embedder")
        );
    }
}
