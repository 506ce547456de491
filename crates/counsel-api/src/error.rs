use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use counsel_prompt::PromptError;
use serde_json::json;
use thiserror::Error;

use crate::secrets::SecretError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Question must not be empty")]
    EmptyInput,

    #[error("Invalid persona: {0}")]
    Persona(#[from] PromptError),

    #[error("Credential error: {0}")]
    Credential(#[from] SecretError),

    #[error("Completion failed: {0}")]
    Completion(#[source] anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::EmptyInput | ApiError::Persona(_) => {
                (StatusCode::BAD_REQUEST, self.to_string())
            }
            ApiError::Credential(ref e) => {
                tracing::error!("Credential resolution failed: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
            }
            ApiError::Completion(ref e) => {
                tracing::error!("Completion request failed: {:#}", e);
                (StatusCode::BAD_GATEWAY, "Completion failed".to_string())
            }
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
