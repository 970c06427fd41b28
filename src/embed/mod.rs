//! Embedding provider abstraction.
//!
//! A collection is only valid for queries embedded with the same model it was
//! built with, so implementations expose their model id and the store records
//! it per collection.

mod http;

pub use http::HttpEmbedder;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("embedding request failed: {0}")]
pub struct EmbedError(pub String);

impl EmbedError {
    pub fn from_err<E: std::fmt::Display>(err: E) -> Self {
        EmbedError(err.to_string())
    }
}

#[async_trait]
pub trait Embedder: Send + Sync {
    /// Identifier of the underlying model, recorded per collection at ingest
    /// time and checked at query time.
    fn model_id(&self) -> &str;

    /// Embed a batch of texts, one vector per input, in input order.
    async fn embed(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>, EmbedError>;
}
