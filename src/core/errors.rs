use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use thiserror::Error;

/// Errors surfaced at the HTTP boundary.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn internal<E: std::fmt::Display>(err: E) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match &self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
        };

        let body = Json(json!({ "error": message }));
        (status, body).into_response()
    }
}

/// Recoverable outcomes of the retrieval pipeline.
///
/// None of these terminate the process; the ask handler folds them into an
/// `{ "error": ... }` body so the chat UI renders a message instead of crashing.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("no collection for category '{0}'")]
    CollectionNotFound(String),
    #[error("no relevant context for the question")]
    NoRelevantContext,
    #[error("retrieval failed: {0}")]
    RetrievalFailed(String),
}

impl QueryError {
    /// Message shown to the end user in the chat window.
    pub fn user_message(&self) -> String {
        match self {
            QueryError::CollectionNotFound(category) => {
                format!("'{category}' 카테고리에 대한 자료가 아직 준비되지 않았어요.")
            }
            QueryError::NoRelevantContext => {
                "관련된 자료를 찾지 못했어요. 조금 더 구체적으로 질문해 주세요.".to_string()
            }
            QueryError::RetrievalFailed(_) => {
                "자료를 검색하는 중 문제가 발생했어요. 잠시 후 다시 시도해 주세요.".to_string()
            }
        }
    }
}

/// Failure of the remote generation call.
#[derive(Debug, Error)]
#[error("generation failed: {0}")]
pub struct GenerationError(pub String);

impl GenerationError {
    pub fn from_err<E: std::fmt::Display>(err: E) -> Self {
        GenerationError(err.to_string())
    }

    pub fn user_message(&self) -> String {
        "답변을 생성하는 중 오류가 발생했어요. 잠시 후 다시 시도해 주세요.".to_string()
    }
}
