//! Error types for the RAG chain

use thiserror::Error;

/// Result type alias for chain operations
pub type Result<T> = std::result::Result<T, Error>;

/// RAG chain errors
#[derive(Debug, Error)]
pub enum Error {
    /// Chain or collaborator misconfigured at construction time
    #[error("Configuration error: {0}")]
    Config(String),

    /// Model-serving call failed (network, timeout, bad response)
    #[error("Model unavailable: {0}")]
    ModelUnavailable(String),

    /// Vector-index call failed
    #[error("Retriever error: {0}")]
    Retriever(String),

    /// Prompt template referenced a slot with no bound value
    #[error("Template error: {0}")]
    Template(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a model-unavailable error
    pub fn model_unavailable(message: impl Into<String>) -> Self {
        Self::ModelUnavailable(message.into())
    }

    /// Create a retriever error
    pub fn retriever(message: impl Into<String>) -> Self {
        Self::Retriever(message.into())
    }

    /// Create a template error
    pub fn template(message: impl Into<String>) -> Self {
        Self::Template(message.into())
    }
}
