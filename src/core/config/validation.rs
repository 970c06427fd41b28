use super::settings::{Settings, SettingsError};

/// Startup validation for the serving binary. Anything rejected here prevents
/// the service from accepting requests at all; nothing in this list is a
/// per-request error.
pub fn validate_settings(settings: &Settings) -> Result<(), SettingsError> {
    validate_ingest_settings(settings)?;

    if settings.generation.base_url.trim().is_empty() {
        return Err(invalid(
            "generation.base_url is required (set DASOM_LLM_URL or generation.base_url)",
        ));
    }
    if settings.generation.max_rounds == 0 {
        return Err(invalid("generation.max_rounds must be at least 1"));
    }
    if !settings.prompt_template.contains("{knowledge_base}")
        || !settings.prompt_template.contains("{user_question}")
    {
        return Err(invalid(
            "prompt_template must contain {knowledge_base} and {user_question}",
        ));
    }
    Ok(())
}

/// Subset needed by the offline ingest binary, which never calls the LLM.
pub fn validate_ingest_settings(settings: &Settings) -> Result<(), SettingsError> {
    if settings.chunking.chunk_size == 0 {
        return Err(invalid("chunking.chunk_size must be at least 1"));
    }
    if settings.chunking.chunk_overlap >= settings.chunking.chunk_size {
        return Err(invalid(
            "chunking.chunk_overlap must be smaller than chunking.chunk_size",
        ));
    }
    if settings.retrieval.top_k == 0 {
        return Err(invalid("retrieval.top_k must be at least 1"));
    }
    if settings.retrieval.kb_word_budget == 0 {
        return Err(invalid("retrieval.kb_word_budget must be at least 1"));
    }
    if settings.embedding.base_url.trim().is_empty() {
        return Err(invalid("embedding.base_url is required"));
    }
    if settings.embedding.batch_size == 0 {
        return Err(invalid("embedding.batch_size must be at least 1"));
    }
    Ok(())
}

fn invalid(msg: &str) -> SettingsError {
    SettingsError::Invalid(msg.to_string())
}
