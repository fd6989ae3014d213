//! Error types for the CV chatbot

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Result type alias for cv-rag operations
pub type Result<T> = std::result::Result<T, Error>;

/// cv-rag errors
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error (includes a missing or rejected API key)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Writing to the content directory failed
    #[error("Failed to store document: {0}")]
    Storage(String),

    /// Persisted index state is present but could not be loaded
    #[error("Failed to load index from storage: {0}")]
    IndexLoad(String),

    /// Building a fresh index failed
    #[error("Failed to build index: {0}")]
    IndexBuild(String),

    /// The file a query refers to no longer exists
    #[error("The specified CV file was not found: {0}")]
    NotFound(String),

    /// No live index exists
    #[error("Index has not been initialized. Please check the data directory or persisted storage.")]
    NotReady,

    /// File parsing error
    #[error("Failed to parse file '{filename}': {message}")]
    FileParse { filename: String, message: String },

    /// Unsupported file type
    #[error("Unsupported file type: {0}")]
    UnsupportedFileType(String),

    /// Embedding error
    #[error("Embedding generation failed: {0}")]
    Embedding(String),

    /// LLM error
    #[error("LLM error: {0}")]
    Llm(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a file parse error
    pub fn file_parse(filename: impl Into<String>, message: impl Into<String>) -> Self {
        Self::FileParse {
            filename: filename.into(),
            message: message.into(),
        }
    }

    /// Create a storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
    }

    /// Create an index load error
    pub fn index_load(message: impl Into<String>) -> Self {
        Self::IndexLoad(message.into())
    }

    /// Create an index build error
    pub fn index_build(message: impl Into<String>) -> Self {
        Self::IndexBuild(message.into())
    }

    /// Create an embedding error
    pub fn embedding(message: impl Into<String>) -> Self {
        Self::Embedding(message.into())
    }

    /// Create an LLM error
    pub fn llm(message: impl Into<String>) -> Self {
        Self::Llm(message.into())
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match &self {
            Error::Config(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "config_error", msg.clone()),
            Error::Storage(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "storage_error", msg.clone()),
            Error::IndexLoad(msg) | Error::IndexBuild(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "index_error", msg.clone())
            }
            Error::NotFound(path) => (
                StatusCode::NOT_FOUND,
                "not_found",
                format!("File not found: {}", path),
            ),
            Error::NotReady => (
                StatusCode::SERVICE_UNAVAILABLE,
                "not_ready",
                self.to_string(),
            ),
            Error::FileParse { filename, message } => (
                StatusCode::BAD_REQUEST,
                "parse_error",
                format!("Failed to parse '{}': {}", filename, message),
            ),
            Error::UnsupportedFileType(ext) => (
                StatusCode::BAD_REQUEST,
                "unsupported_type",
                format!("Unsupported file type: {}", ext),
            ),
            Error::Embedding(msg) => {
                (StatusCode::BAD_GATEWAY, "embedding_error", msg.clone())
            }
            Error::Llm(msg) => (StatusCode::SERVICE_UNAVAILABLE, "llm_error", msg.clone()),
            Error::Io(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "io_error",
                err.to_string(),
            ),
            Error::Json(err) => (StatusCode::BAD_REQUEST, "json_error", err.to_string()),
            Error::Internal(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", msg.clone())
            }
        };

        let body = Json(json!({
            "error": {
                "type": error_type,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_ready_message_matches_banner() {
        assert_eq!(
            Error::NotReady.to_string(),
            "Index has not been initialized. Please check the data directory or persisted storage."
        );
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            Error::NotFound("x.pdf".into()).into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            Error::NotReady.into_response().status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }
}
