//! Error types for docqa
//!
//! One error enum for the library; the binary wraps it with `anyhow`.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for document question answering
#[derive(Error, Debug)]
pub enum QaError {
    /// Pretrained encoder or tokenizer could not be loaded
    #[error("Failed to load model '{model_id}': {reason}")]
    ModelLoad { model_id: String, reason: String },

    /// Tokenization failed for a specific input
    #[error("Encoding failed: {0}")]
    Encoding(String),

    /// Forward pass or pooling failed
    #[error("Inference failed: {0}")]
    Inference(#[from] candle_core::Error),

    /// Question and document embeddings disagree on length
    #[error("Embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Retrieval requires a question with content
    #[error("Question must not be empty")]
    EmptyQuestion,

    /// Document could not be read or parsed
    #[error("Failed to load document '{}': {reason}", path.display())]
    DocumentLoad { path: PathBuf, reason: String },

    /// File extension is not one of txt, pdf, json
    #[error("Unsupported document format: {0}")]
    UnsupportedFormat(String),

    /// Hosted LLM API errors
    #[error("LLM API error: {0}")]
    LlmApi(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// HTTP client errors
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic errors with context
    #[error("{0}")]
    Generic(String),
}

/// Result type alias for docqa operations
pub type Result<T> = std::result::Result<T, QaError>;

impl QaError {
    /// Errors after which a running session cannot do anything useful
    pub fn is_fatal(&self) -> bool {
        matches!(self, QaError::ModelLoad { .. } | QaError::Config(_))
    }

    pub(crate) fn model_load(model_id: &str, reason: impl std::fmt::Display) -> Self {
        QaError::ModelLoad {
            model_id: model_id.to_string(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn document_load(path: impl Into<PathBuf>, reason: impl std::fmt::Display) -> Self {
        QaError::DocumentLoad {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

/// Convert anyhow errors to QaError
impl From<anyhow::Error> for QaError {
    fn from(err: anyhow::Error) -> Self {
        QaError::Generic(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = QaError::DimensionMismatch {
            expected: 384,
            actual: 768,
        };
        assert!(err.to_string().contains("384"));
        assert!(err.to_string().contains("768"));
    }

    #[test]
    fn test_model_load_error() {
        let err = QaError::model_load("bert-tiny", "missing weights");
        assert!(err.to_string().contains("bert-tiny"));
        assert!(err.to_string().contains("missing weights"));
        assert!(err.is_fatal());
    }

    #[test]
    fn test_encoding_error_is_not_fatal() {
        assert!(!QaError::Encoding("bad input".to_string()).is_fatal());
        assert!(!QaError::EmptyQuestion.is_fatal());
    }

    #[test]
    fn test_document_load_error_shows_path() {
        let err = QaError::document_load("/tmp/missing.txt", "file does not exist");
        assert!(err.to_string().contains("/tmp/missing.txt"));
    }
}
