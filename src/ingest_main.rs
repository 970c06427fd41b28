//! Offline ingestion entrypoint.
//!
//! Reads the corpus from `DASOM_DATA_DIR` (or the configured default), writes
//! per-category collections under `DASOM_PERSIST_DIR`, and prints a summary.
//! Run this while the server is stopped; the serving process treats
//! collections as read-only.

use std::sync::Arc;

use anyhow::Context;

use dasom_backend::core::config::{validate_ingest_settings, AppPaths, Settings};
use dasom_backend::core::logging;
use dasom_backend::embed::HttpEmbedder;
use dasom_backend::ingest::IngestPipeline;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    let paths = AppPaths::new();
    let settings = Settings::load(&paths.config_path).context("Failed to load settings")?;
    validate_ingest_settings(&settings).context("Invalid settings")?;
    logging::init(&paths);

    let embedder = Arc::new(HttpEmbedder::new(&settings.embedding));
    let pipeline = IngestPipeline::new(settings, embedder);

    tracing::info!(
        "Ingesting {} into {}",
        paths.data_dir.display(),
        paths.persist_dir.display()
    );

    let report = pipeline
        .run(&paths.data_dir, &paths.persist_dir)
        .await
        .context("Ingestion failed")?;

    tracing::info!(
        "Done: {} files loaded, {} unsupported, {} unreadable, {} chunks written",
        report.files_loaded,
        report.files_skipped_unsupported,
        report.files_skipped_unreadable,
        report.chunks_written
    );
    for (category, count) in &report.collections {
        tracing::info!("  {}: {} chunks", category, count);
    }

    Ok(())
}
