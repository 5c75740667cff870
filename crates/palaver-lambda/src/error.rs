use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use palaver_bedrock::error::BedrockError;
use palaver_core::error::CoreError;
use palaver_storage::error::StorageError;

/// Unified API error type for all route handlers.
#[derive(Debug)]
pub enum ApiError {
    /// Missing or malformed request body or query.
    BadRequest(String),
    Unauthorized(String),
    /// The model call failed or its reply could not be read.
    Inference(String),
    /// The turn table could not be read or written.
    Storage(String),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Inference(_) => StatusCode::BAD_GATEWAY,
            ApiError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "validation",
            ApiError::Unauthorized(_) => "unauthorized",
            ApiError::Inference(_) => "inference",
            ApiError::Storage(_) => "storage",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let kind = self.kind();
        let message = match self {
            ApiError::BadRequest(msg)
            | ApiError::Unauthorized(msg)
            | ApiError::Inference(msg)
            | ApiError::Storage(msg) => msg,
        };

        if status.is_server_error() {
            tracing::error!(kind, status = status.as_u16(), "request failed: {message}");
        } else {
            tracing::warn!(kind, status = status.as_u16(), "request rejected: {message}");
        }

        (status, Json(ErrorBody { error: message })).into_response()
    }
}

impl From<CoreError> for ApiError {
    fn from(e: CoreError) -> Self {
        ApiError::BadRequest(e.to_string())
    }
}

impl From<BedrockError> for ApiError {
    fn from(e: BedrockError) -> Self {
        ApiError::Inference(e.to_string())
    }
}

impl From<StorageError> for ApiError {
    fn from(e: StorageError) -> Self {
        ApiError::Storage(e.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::BadRequest(e.to_string())
    }
}
