//! Error types for the RunCoach domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error variant.

use std::path::PathBuf;
use thiserror::Error;

/// The top-level error type for all RunCoach operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Provider errors ---
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    // --- Retrieval errors ---
    #[error("Retrieval error: {0}")]
    Retrieval(#[from] RetrievalError),

    // --- Tool errors ---
    #[error("Tool error: {0}")]
    Tool(#[from] ToolError),

    // --- Configuration errors ---
    #[error("Configuration error: {message}")]
    Config { message: String },

    // --- Serialization ---
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // --- Generic ---
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError {
        status_code: u16,
        message: String,
    },

    #[error("Rate limited by provider, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Model not found: {0}")]
    ModelNotFound(String),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(String),
}

/// Failures that keep the knowledge index from becoming ready.
///
/// A missing or empty corpus is fatal: the index never reports ready with
/// zero documents.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("No documents found! Add documents to {}", path.display())]
    MissingSource { path: PathBuf },

    #[error("No documents found in {}", path.display())]
    NoDocuments { path: PathBuf },

    #[error("I/O error at {}: {reason}", path.display())]
    Io { path: PathBuf, reason: String },

    #[error("Embedding failed during ingestion: {0}")]
    Embedding(#[from] ProviderError),

    #[error("Persisted index at {} is unreadable: {reason}", path.display())]
    CorruptIndex { path: PathBuf, reason: String },
}

#[derive(Debug, Error)]
pub enum RetrievalError {
    #[error("Knowledge index setup failed: {0}")]
    Setup(#[from] SetupError),

    #[error("Query embedding failed: {0}")]
    Embedding(#[from] ProviderError),
}

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Tool not found: {0}")]
    NotFound(String),

    #[error("Tool already registered: {0}")]
    Duplicate(String),

    #[error("Tool execution failed: {tool_name}: {reason}")]
    ExecutionFailed { tool_name: String, reason: String },

    #[error("Tool timed out: {tool_name} after {timeout_secs}s")]
    Timeout { tool_name: String, timeout_secs: u64 },

    #[error("Invalid tool arguments: {0}")]
    InvalidArguments(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_error_displays_correctly() {
        let err = Error::Provider(ProviderError::ApiError {
            status_code: 429,
            message: "Too many requests".into(),
        });
        assert!(err.to_string().contains("429"));
        assert!(err.to_string().contains("Too many requests"));
    }

    #[test]
    fn tool_error_displays_correctly() {
        let err = Error::Tool(ToolError::ExecutionFailed {
            tool_name: "get_weather".into(),
            reason: "connection refused".into(),
        });
        assert!(err.to_string().contains("get_weather"));
        assert!(err.to_string().contains("connection refused"));
    }

    #[test]
    fn setup_error_names_the_directory() {
        let err = SetupError::NoDocuments {
            path: PathBuf::from("knowledge_base/documents"),
        };
        assert!(err.to_string().contains("knowledge_base/documents"));

        let wrapped = RetrievalError::from(err);
        assert!(wrapped.to_string().starts_with("Knowledge index setup failed"));
    }
}
