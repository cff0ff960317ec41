use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Failure talking to the upstream GIF provider. Always surfaced to clients
/// as a generic 500; the detail stays in the server log.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("request to media provider failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("media provider returned status {0}")]
    UpstreamStatus(reqwest::StatusCode),
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("invalid request: {0}")]
    Validation(#[from] crate::validation::ValidationError),

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("database error: {0}")]
    Database(#[from] diesel::result::Error),

    #[error("favorite not found")]
    NotFound,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            ApiError::Validation(ref err) => (StatusCode::BAD_REQUEST, err.to_string()),
            ApiError::NotFound => (StatusCode::NOT_FOUND, self.to_string()),
            ApiError::Provider(ref err) => {
                error!(error = %err, "GIF provider request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to reach the GIF provider".to_string(),
                )
            }
            ApiError::Database(ref err) => {
                // Log the detailed error but don't expose it to the client
                error!(error = %err, "Database error occurred");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": error_message
        }));

        (status, body).into_response()
    }
}
