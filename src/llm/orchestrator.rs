//! Generation orchestration.
//!
//! Simple mode is one call. Iterative mode assembles a longer answer from up
//! to `max_rounds` calls, filtering near-duplicate lines and stopping early
//! when the answer is long enough, ends on a sentence boundary, or the model
//! gets stuck repeating itself.

use std::sync::Arc;

use super::dedup::{LineDeduper, DEFAULT_PREFIX_CHARS};
use super::provider::GenerationProvider;
use crate::core::config::{GenerationMode, GenerationSettings};
use crate::core::errors::GenerationError;

pub struct Generator {
    provider: Arc<dyn GenerationProvider>,
    settings: GenerationSettings,
    footer: Option<String>,
}

impl Generator {
    pub fn new(
        provider: Arc<dyn GenerationProvider>,
        settings: GenerationSettings,
        footer: Option<String>,
    ) -> Self {
        Self {
            provider,
            settings,
            footer,
        }
    }

    pub async fn generate_answer(&self, prompt: &str) -> Result<String, GenerationError> {
        let body = match self.settings.mode {
            GenerationMode::Simple => self.generate_simple(prompt).await?,
            GenerationMode::Iterative => self.generate_iterative(prompt).await?,
        };

        let mut answer = body.trim().to_string();
        if let Some(footer) = &self.footer {
            answer.push_str("\n\n");
            answer.push_str(footer);
        }
        Ok(answer)
    }

    async fn generate_simple(&self, prompt: &str) -> Result<String, GenerationError> {
        self.provider.generate(prompt).await
    }

    async fn generate_iterative(&self, prompt: &str) -> Result<String, GenerationError> {
        let mut deduper = LineDeduper::new(DEFAULT_PREFIX_CHARS);
        let mut accumulated: Vec<String> = Vec::new();
        let mut total_chars = 0usize;
        let mut last_output: Option<String> = None;

        for round in 0..self.settings.max_rounds {
            let output = self.provider.generate(prompt).await?;

            // Stuck generation: two byte-identical outputs in a row.
            if last_output.as_deref() == Some(output.as_str()) {
                tracing::debug!(round, "generation repeated itself, stopping");
                break;
            }

            if output.trim().chars().count() < self.settings.min_fragment_chars {
                tracing::debug!(round, len = output.len(), "noise fragment, retrying");
                last_output = Some(output);
                continue;
            }

            let mut last_line_terminal = false;
            for line in output.lines() {
                let line = line.trim_end();
                if deduper.accept(line) {
                    total_chars += line.chars().count();
                    last_line_terminal = ends_sentence(line);
                    accumulated.push(line.to_string());
                }
            }

            last_output = Some(output);

            if total_chars >= self.settings.target_answer_chars {
                tracing::debug!(round, total_chars, "answer budget reached");
                break;
            }
            if last_line_terminal {
                tracing::debug!(round, "answer ends on a sentence boundary");
                break;
            }
        }

        Ok(accumulated.join("\n"))
    }
}

/// Sentence-terminal characters, including the closing emoji the persona
/// templates tend to end on.
fn ends_sentence(line: &str) -> bool {
    match line.trim_end().chars().last() {
        Some(c) => {
            matches!(c, '.' | '!' | '?' | '…' | '다' | '요') || (c as u32) >= 0x1F300
        }
        None => false,
    }
}
