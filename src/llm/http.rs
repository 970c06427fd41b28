use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};

use super::provider::GenerationProvider;
use crate::core::config::GenerationSettings;
use crate::core::errors::GenerationError;

/// Client for an OpenAI-compatible `/v1/chat/completions` endpoint.
///
/// The request timeout is configured here; a hung upstream fails the request
/// instead of blocking its task forever.
#[derive(Clone)]
pub struct HttpGenerator {
    base_url: String,
    model: String,
    api_key: Option<String>,
    settings: GenerationSettings,
    client: Client,
}

impl HttpGenerator {
    pub fn new(settings: &GenerationSettings) -> Result<Self, GenerationError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .build()
            .map_err(GenerationError::from_err)?;

        Ok(Self {
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            model: settings.model.clone(),
            api_key: settings.api_key.clone(),
            settings: settings.clone(),
            client,
        })
    }
}

#[async_trait]
impl GenerationProvider for HttpGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        let url = format!("{}/v1/chat/completions", self.base_url);

        let mut body = json!({
            "model": self.model,
            "messages": [{ "role": "user", "content": prompt }],
            "stream": false,
            "temperature": self.settings.temperature,
            "max_tokens": self.settings.max_new_tokens,
        });

        if let Some(obj) = body.as_object_mut() {
            if !self.settings.stop_sequences.is_empty() {
                obj.insert("stop".to_string(), json!(self.settings.stop_sequences));
            }
            if self.settings.repetition_penalty != 1.0 {
                obj.insert(
                    "repetition_penalty".to_string(),
                    json!(self.settings.repetition_penalty),
                );
            }
            if self.settings.min_new_tokens > 1 {
                obj.insert("min_tokens".to_string(), json!(self.settings.min_new_tokens));
            }
        }

        let mut request = self.client.post(&url).json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let res = request.send().await.map_err(GenerationError::from_err)?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            return Err(GenerationError(format!("{status}: {text}")));
        }

        let payload: Value = res.json().await.map_err(GenerationError::from_err)?;

        let content = payload["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| GenerationError("malformed completion response".to_string()))?;

        Ok(content.to_string())
    }
}
