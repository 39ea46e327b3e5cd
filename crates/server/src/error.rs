use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use similarity::ResolveError;
use store::StoreError;

pub type ServerResult<T> = Result<T, ServerError>;

/// Server error types
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Resolve error: {0}")]
    Resolve(#[from] ResolveError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Not found")]
    NotFound,
}

impl ServerError {
    /// Get HTTP status code for this error
    fn status_code(&self) -> StatusCode {
        match self {
            ServerError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ServerError::NotFound => StatusCode::NOT_FOUND,
            ServerError::Resolve(err) => match err {
                ResolveError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
                ResolveError::NotFound(_) => StatusCode::NOT_FOUND,
                ResolveError::NoEmbedding(_) | ResolveError::Decode(_) => {
                    StatusCode::UNPROCESSABLE_ENTITY
                }
                ResolveError::Remote { .. }
                | ResolveError::Reference(_)
                | ResolveError::Candidates(_)
                | ResolveError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ServerError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ServerError::Internal(_) | ServerError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get error code string
    fn error_code(&self) -> &'static str {
        match self {
            ServerError::BadRequest(_) => "BAD_REQUEST",
            ServerError::NotFound => "NOT_FOUND",
            ServerError::Resolve(err) => match err {
                ResolveError::InvalidRequest(_) => "BAD_REQUEST",
                ResolveError::NotFound(_) => "NOT_FOUND",
                ResolveError::NoEmbedding(_) => "NO_EMBEDDING",
                ResolveError::Decode(_) => "DECODE_ERROR",
                ResolveError::Remote { .. } => "REMOTE_ERROR",
                ResolveError::Reference(_) | ResolveError::Candidates(_) => "STORE_ERROR",
                ResolveError::Internal(_) => "INTERNAL_ERROR",
            },
            ServerError::Store(_) => "STORE_ERROR",
            ServerError::Internal(_) => "INTERNAL_ERROR",
            ServerError::Config(_) => "CONFIG_ERROR",
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_code = self.error_code().to_string();
        let message = self.to_string();

        let body = Json(json!({
            "error": {
                "code": error_code,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}

impl From<std::net::AddrParseError> for ServerError {
    fn from(err: std::net::AddrParseError) -> Self {
        ServerError::Config(format!("Invalid address: {err}"))
    }
}

impl From<std::io::Error> for ServerError {
    fn from(err: std::io::Error) -> Self {
        ServerError::Internal(format!("IO error: {err}"))
    }
}

impl From<serde_json::Error> for ServerError {
    fn from(err: serde_json::Error) -> Self {
        ServerError::BadRequest(format!("JSON parse error: {err}"))
    }
}

impl From<anyhow::Error> for ServerError {
    fn from(err: anyhow::Error) -> Self {
        ServerError::Internal(err.to_string())
    }
}
