//! Retrieval-and-prompt pipeline.
//!
//! One execution per user turn: normalize the category, load the matching
//! collection, embed the question, retrieve top-K chunks, trim them to the
//! word budget, and render the instruction prompt. Holds no per-request state
//! beyond the read-only collection cache.

pub mod budget;
pub mod category;
pub mod prompt;

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::RwLock;

use crate::core::config::Settings;
use crate::core::errors::QueryError;
use crate::embed::Embedder;
use crate::store::{SqliteCollection, StoreError, VectorCollection};

/// Optional caller profile used to focus retrieval in the single-collection
/// deployment: the embedded search text is prefixed with age/gender/category.
#[derive(Debug, Clone, Default)]
pub struct UserProfile {
    pub gender: Option<String>,
    pub age: Option<u32>,
}

/// Preview of one retrieved chunk, returned for observability.
#[derive(Debug, Clone, Serialize)]
pub struct RetrievedDoc {
    pub source: String,
    pub content: String,
}

/// Output of the pipeline: the rendered prompt plus the retrieved sources.
#[derive(Debug, Clone)]
pub struct RetrievedPrompt {
    pub prompt: String,
    pub docs: Vec<RetrievedDoc>,
}

const PREVIEW_CHARS: usize = 300;

pub struct QueryPipeline {
    settings: Arc<Settings>,
    persist_dir: PathBuf,
    embedder: Arc<dyn Embedder>,
    collections: RwLock<HashMap<String, Arc<SqliteCollection>>>,
}

impl QueryPipeline {
    pub fn new(settings: Arc<Settings>, persist_dir: PathBuf, embedder: Arc<dyn Embedder>) -> Self {
        Self {
            settings,
            persist_dir,
            embedder,
            collections: RwLock::new(HashMap::new()),
        }
    }

    /// Resolves a question against a category collection and renders the
    /// generation prompt. Every failure mode is a structured `QueryError`;
    /// nothing escapes this boundary unhandled.
    pub async fn answer_query(
        &self,
        raw_category: &str,
        question: &str,
        profile: &UserProfile,
    ) -> Result<RetrievedPrompt, QueryError> {
        let key = category::normalize(raw_category, &self.settings.categories.synonyms);
        let collection = self.collection(&key).await?;

        let retriever_input = build_retriever_input(question, &key, profile);
        tracing::debug!(category = %key, input = %retriever_input, "retrieving");

        let embeddings = self
            .embedder
            .embed(&[retriever_input])
            .await
            .map_err(|e| QueryError::RetrievalFailed(e.to_string()))?;
        let query_embedding = embeddings
            .into_iter()
            .next()
            .ok_or_else(|| QueryError::RetrievalFailed("empty embedding response".to_string()))?;

        let hits = collection
            .search(&query_embedding, self.settings.retrieval.top_k)
            .await
            .map_err(|e| QueryError::RetrievalFailed(e.to_string()))?;

        if hits.is_empty() {
            return Err(QueryError::NoRelevantContext);
        }

        let docs: Vec<RetrievedDoc> = hits
            .iter()
            .map(|hit| RetrievedDoc {
                source: hit.chunk.source.clone(),
                content: hit.chunk.text.chars().take(PREVIEW_CHARS).collect(),
            })
            .collect();

        let texts: Vec<String> = hits.into_iter().map(|hit| hit.chunk.text).collect();
        let knowledge_base =
            budget::assemble_knowledge_base(&texts, self.settings.retrieval.kb_word_budget);

        let prompt = prompt::render_prompt(&self.settings.prompt_template, &knowledge_base, question);

        Ok(RetrievedPrompt { prompt, docs })
    }

    /// Returns the cached collection handle for `key`, opening and
    /// fingerprint-checking it on first use.
    async fn collection(&self, key: &str) -> Result<Arc<SqliteCollection>, QueryError> {
        if let Some(found) = self.collections.read().await.get(key) {
            return Ok(found.clone());
        }

        let opened = match SqliteCollection::open(&self.persist_dir, key).await {
            Ok(collection) => Arc::new(collection),
            Err(StoreError::NotFound(_)) => {
                return Err(QueryError::CollectionNotFound(key.to_string()))
            }
            Err(e) => return Err(QueryError::RetrievalFailed(e.to_string())),
        };

        match opened
            .embedding_model()
            .await
            .map_err(|e| QueryError::RetrievalFailed(e.to_string()))?
        {
            Some(model) if model != self.embedder.model_id() => {
                return Err(QueryError::RetrievalFailed(format!(
                    "collection '{}' was built with embedding model '{}' but the \
                     service is configured for '{}'; re-ingest the corpus",
                    key,
                    model,
                    self.embedder.model_id()
                )));
            }
            Some(_) => {}
            None => {
                tracing::warn!(
                    "collection '{}' has no embedding model fingerprint; assuming it matches",
                    key
                );
            }
        }

        self.collections
            .write()
            .await
            .insert(key.to_string(), opened.clone());
        Ok(opened)
    }
}

fn build_retriever_input(question: &str, category: &str, profile: &UserProfile) -> String {
    match (&profile.age, &profile.gender) {
        (Some(age), Some(gender)) => format!("{age}세 {gender} {category} : {question}"),
        _ => question.to_string(),
    }
}
