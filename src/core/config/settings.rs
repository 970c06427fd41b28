use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Default instruction template. `{knowledge_base}` and `{user_question}` are
/// substituted verbatim at query time.
pub const DEFAULT_PROMPT_TEMPLATE: &str = "\
당신은 정직하고 다정한 AI 상담사이고, 당신의 고객은 보호종료아동이에요.
청소년에게 설명하듯이 친절하고 구체적으로, 해요체로 답변해 주세요.

지시사항:
- 반드시 아래 knowledge base를 기반으로 답변하세요.
- 추가적인 가정이나 추측을 하지 마세요.
- 문단 사이에 공백을 넣어 읽기 쉽게 작성하세요.

다음은 참고해야 할 knowledge base입니다:
{knowledge_base}

---
사용자의 질문: {user_question}
답변:
";

pub const DEFAULT_ANSWER_FOOTER: &str = "\
=========================================
📞 관련 기관 문의: 1855-2455
💕 당신의 힘찬 내일을 응원합니다 💕";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub embedding: EmbeddingSettings,
    pub generation: GenerationSettings,
    pub chunking: ChunkingSettings,
    pub retrieval: RetrievalSettings,
    pub ingest: IngestSettings,
    pub categories: CategorySettings,
    pub prompt_template: String,
    pub answer_footer: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingSettings {
    /// OpenAI-compatible base URL serving `/v1/embeddings`.
    pub base_url: String,
    pub model: String,
    pub api_key: Option<String>,
    /// Chunk texts embedded per request during ingestion.
    pub batch_size: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationMode {
    Simple,
    Iterative,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationSettings {
    /// OpenAI-compatible base URL serving `/v1/chat/completions`.
    pub base_url: String,
    pub model: String,
    pub api_key: Option<String>,
    pub mode: GenerationMode,
    pub max_new_tokens: u32,
    pub min_new_tokens: u32,
    pub temperature: f64,
    pub repetition_penalty: f64,
    pub stop_sequences: Vec<String>,
    pub request_timeout_secs: u64,
    /// Iterative mode: maximum number of generation calls per answer.
    pub max_rounds: usize,
    /// Iterative mode: stop once the accumulated answer reaches this many chars.
    pub target_answer_chars: usize,
    /// Outputs shorter than this are treated as noise and retried.
    pub min_fragment_chars: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingSettings {
    pub chunk_size: usize,
    pub chunk_overlap: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalSettings {
    pub top_k: usize,
    /// Word budget for the knowledge base assembled from retrieved chunks.
    pub kb_word_budget: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryMode {
    /// Whole corpus goes into one collection named by `default_collection`.
    Single,
    /// First-level subdirectory names become collection keys.
    PerSubdirectory,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestSettings {
    pub category_mode: CategoryMode,
    pub default_collection: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CategorySettings {
    /// Maps user-facing labels to canonical collection keys.
    pub synonyms: HashMap<String, String>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            server: ServerSettings::default(),
            embedding: EmbeddingSettings::default(),
            generation: GenerationSettings::default(),
            chunking: ChunkingSettings::default(),
            retrieval: RetrievalSettings::default(),
            ingest: IngestSettings::default(),
            categories: CategorySettings::default(),
            prompt_template: DEFAULT_PROMPT_TEMPLATE.to_string(),
            answer_footer: Some(DEFAULT_ANSWER_FOOTER.to_string()),
        }
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        ServerSettings {
            host: "127.0.0.1".to_string(),
            port: 8030,
        }
    }
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        EmbeddingSettings {
            base_url: "http://localhost:1234".to_string(),
            model: "all-minilm-l6-v2".to_string(),
            api_key: None,
            batch_size: 32,
        }
    }
}

impl Default for GenerationSettings {
    fn default() -> Self {
        GenerationSettings {
            base_url: String::new(),
            model: "meta-llama/llama-3-3-70b-instruct".to_string(),
            api_key: None,
            mode: GenerationMode::Simple,
            max_new_tokens: 1000,
            min_new_tokens: 1,
            temperature: 0.0,
            repetition_penalty: 1.0,
            stop_sequences: vec!["<|endoftext|>".to_string()],
            request_timeout_secs: 120,
            max_rounds: 4,
            target_answer_chars: 1600,
            min_fragment_chars: 50,
        }
    }
}

impl Default for ChunkingSettings {
    fn default() -> Self {
        ChunkingSettings {
            chunk_size: 800,
            chunk_overlap: 200,
        }
    }
}

impl Default for RetrievalSettings {
    fn default() -> Self {
        RetrievalSettings {
            top_k: 3,
            kb_word_budget: 800,
        }
    }
}

impl Default for IngestSettings {
    fn default() -> Self {
        IngestSettings {
            category_mode: CategoryMode::PerSubdirectory,
            default_collection: "general".to_string(),
        }
    }
}

impl Default for CategorySettings {
    fn default() -> Self {
        let mut synonyms = HashMap::new();
        synonyms.insert("핸드폰".to_string(), "통신".to_string());
        synonyms.insert("휴대폰".to_string(), "통신".to_string());
        CategorySettings { synonyms }
    }
}

impl Settings {
    /// Loads settings from `config.yml` (if present) and overlays environment
    /// variables. Env always wins so deployments can override the file.
    pub fn load(config_path: &Path) -> Result<Self, SettingsError> {
        let mut settings = if config_path.exists() {
            let raw = fs::read_to_string(config_path)
                .map_err(|e| SettingsError::Io(config_path.display().to_string(), e))?;
            serde_yaml::from_str(&raw)
                .map_err(|e| SettingsError::Parse(config_path.display().to_string(), e))?
        } else {
            Settings::default()
        };

        settings.apply_env();
        Ok(settings)
    }

    fn apply_env(&mut self) {
        if let Some(v) = env_string("DASOM_EMBEDDING_URL") {
            self.embedding.base_url = v;
        }
        if let Some(v) = env_string("DASOM_EMBEDDING_MODEL") {
            self.embedding.model = v;
        }
        if let Some(v) = env_string("DASOM_EMBEDDING_API_KEY") {
            self.embedding.api_key = Some(v);
        }
        if let Some(v) = env_string("DASOM_LLM_URL") {
            self.generation.base_url = v;
        }
        if let Some(v) = env_string("DASOM_LLM_MODEL") {
            self.generation.model = v;
        }
        if let Some(v) = env_string("DASOM_LLM_API_KEY") {
            self.generation.api_key = Some(v);
        }
        if let Some(v) = env_string("PORT").and_then(|v| v.parse().ok()) {
            self.server.port = v;
        }
    }
}

fn env_string(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.is_empty())
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("failed to read {0}: {1}")]
    Io(String, #[source] std::io::Error),
    #[error("failed to parse {0}: {1}")]
    Parse(String, #[source] serde_yaml::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let settings = Settings::default();
        assert!(settings.chunking.chunk_overlap < settings.chunking.chunk_size);
        assert!(settings.retrieval.top_k >= 1);
        assert_eq!(settings.categories.synonyms.get("핸드폰").unwrap(), "통신");
        assert!(settings.prompt_template.contains("{knowledge_base}"));
        assert!(settings.prompt_template.contains("{user_question}"));
    }

    #[test]
    fn yaml_overrides_defaults() {
        let yaml = "retrieval:\n  top_k: 5\n  kb_word_budget: 700\n";
        let settings: Settings = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(settings.retrieval.top_k, 5);
        assert_eq!(settings.retrieval.kb_word_budget, 700);
        // untouched sections keep defaults
        assert_eq!(settings.chunking.chunk_size, 800);
    }
}
