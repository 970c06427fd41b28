use std::sync::Arc;

use crate::core::config::{validate_settings, AppPaths, Settings, SettingsError};
use crate::embed::HttpEmbedder;
use crate::llm::{Generator, HttpGenerator};
use crate::pipeline::QueryPipeline;

/// Shared application state. The pipeline's collection cache is the only
/// state reused across requests, and it is read-only after load.
pub struct AppState {
    pub paths: Arc<AppPaths>,
    pub settings: Arc<Settings>,
    pub pipeline: QueryPipeline,
    pub generator: Generator,
}

impl AppState {
    /// Loads and validates configuration, then wires the pipeline. Any error
    /// here aborts startup before the listener binds.
    pub fn initialize() -> Result<Arc<Self>, SettingsError> {
        let paths = Arc::new(AppPaths::new());
        let settings = Arc::new(Settings::load(&paths.config_path)?);
        validate_settings(&settings)?;

        let embedder = Arc::new(HttpEmbedder::new(&settings.embedding));
        let pipeline = QueryPipeline::new(
            settings.clone(),
            paths.persist_dir.clone(),
            embedder,
        );

        let provider = Arc::new(
            HttpGenerator::new(&settings.generation)
                .map_err(|e| SettingsError::Invalid(e.to_string()))?,
        );
        let generator = Generator::new(
            provider,
            settings.generation.clone(),
            settings.answer_footer.clone(),
        );

        Ok(Arc::new(AppState {
            paths,
            settings,
            pipeline,
            generator,
        }))
    }
}
