use async_trait::async_trait;

use crate::core::errors::GenerationError;

/// One remote completion call. The orchestrator layers retry/accumulation
/// behavior on top of this.
#[async_trait]
pub trait GenerationProvider: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError>;
}
