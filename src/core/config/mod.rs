mod paths;
mod settings;
mod validation;

pub use paths::AppPaths;
pub use settings::{
    CategoryMode, CategorySettings, ChunkingSettings, EmbeddingSettings, GenerationMode,
    GenerationSettings, IngestSettings, RetrievalSettings, ServerSettings, Settings,
    SettingsError, DEFAULT_ANSWER_FOOTER, DEFAULT_PROMPT_TEMPLATE,
};
pub use validation::{validate_ingest_settings, validate_settings};
