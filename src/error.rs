//! Error types for gait
//!
//! Centralized error handling using thiserror.

use std::path::PathBuf;
use thiserror::Error;

/// All error types that can occur in gait
#[derive(Debug, Error)]
pub enum GaitError {
    /// Name not present in the tool registry
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// Registered tool whose binary is absent on disk
    #[error("Tool '{name}' not found at {path}")]
    ToolMissing { name: String, path: PathBuf },

    /// Required API key environment variable not set
    #[error("Missing API key: environment variable {0} not set")]
    MissingApiKey(String),

    /// Non-success response from a provider API
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Provider asked us to back off
    #[error("Rate limited, retry after {retry_after} seconds")]
    RateLimited { retry_after: u64 },

    /// Response body did not have the expected shape
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// No text available from argument, file, or stdin
    #[error("No input provided. Use -h for help.")]
    NoInput,

    /// Editor-based composition failed
    #[error("Editor error: {0}")]
    Editor(String),

    /// Tokenizer construction or decoding failed
    #[error("Tokenizer error: {0}")]
    Tokenizer(String),

    /// Streaming transport error
    #[error("Stream error: {0}")]
    Stream(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP transport error
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl GaitError {
    /// Whether retrying the same request could plausibly succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            GaitError::RateLimited { .. } => true,
            GaitError::Api { status, .. } => *status >= 500,
            GaitError::Network(_) => true,
            GaitError::Stream(_) => true,
            _ => false,
        }
    }
}

/// Result type alias for gait operations
pub type Result<T> = std::result::Result<T, GaitError>;
