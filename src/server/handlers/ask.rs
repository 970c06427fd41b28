use std::sync::Arc;

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use crate::core::errors::ApiError;
use crate::pipeline::UserProfile;
use crate::server::state::AppState;

/// Accepts both request shapes the chat UIs send: `{prompt, category}` from
/// the multi-page UI and `{question, gender, age, category}` from the
/// profile-aware variant.
#[derive(Debug, Deserialize)]
pub struct AskRequest {
    #[serde(default)]
    prompt: Option<String>,
    #[serde(default)]
    question: Option<String>,
    category: String,
    #[serde(default)]
    gender: Option<String>,
    #[serde(default)]
    age: Option<u32>,
}

impl AskRequest {
    fn question(&self) -> Option<&str> {
        // A blank `prompt` falls through to `question`, not to a rejection.
        [self.prompt.as_deref(), self.question.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|q| !q.is_empty())
    }
}

/// `POST /ask` — the one serving endpoint.
///
/// Recoverable pipeline failures come back as HTTP 200 with an `{error}`
/// body, which the chat UIs render as a message bubble.
pub async fn ask(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AskRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let Some(question) = request.question() else {
        return Err(ApiError::BadRequest(
            "question must not be empty".to_string(),
        ));
    };

    let profile = UserProfile {
        gender: request.gender.clone(),
        age: request.age,
    };

    let retrieved = match state
        .pipeline
        .answer_query(&request.category, question, &profile)
        .await
    {
        Ok(retrieved) => retrieved,
        Err(err) => {
            tracing::warn!(category = %request.category, "retrieval failed: {}", err);
            return Ok(Json(json!({ "error": err.user_message() })));
        }
    };

    match state.generator.generate_answer(&retrieved.prompt).await {
        Ok(answer) => Ok(Json(json!({
            "question": question,
            "answer": answer,
            "retrieved_docs": retrieved.docs,
        }))),
        Err(err) => {
            tracing::error!("generation failed: {}", err);
            Ok(Json(json!({ "error": err.user_message() })))
        }
    }
}
