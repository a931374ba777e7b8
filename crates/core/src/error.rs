//! Error types for the chonk workspace.
//!
//! This module defines a unified error enum covering construction-time
//! validation, rule parsing, tokenizer failures, and internal invariant
//! violations raised by the chunking engine.

use thiserror::Error;

/// Unified error type for chonk.
///
/// All fallible functions return `Result<T, ChunkError>`.
/// Offset resolution failures are not errors; they degrade to `(0, 0)`.
#[derive(Error, Debug)]
pub enum ChunkError {
    /// Invalid construction options or configuration values
    #[error("Configuration error: {0}")]
    Config(String),

    /// Malformed recursive rule level
    #[error("Invalid rule: {0}")]
    InvalidRule(String),

    /// Tokenizer encode/decode failures
    #[error("Tokenizer error: {0}")]
    Tokenizer(String),

    /// Merger received pieces and token counts of different lengths
    #[error("Number of splits {splits} does not match number of token counts {token_counts}")]
    MergeMismatch { splits: usize, token_counts: usize },

    /// I/O and filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for ChunkError {
    fn from(err: serde_json::Error) -> Self {
        ChunkError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for ChunkError {
    fn from(err: serde_yaml::Error) -> Self {
        ChunkError::Serialization(err.to_string())
    }
}

/// Convenience type alias for Results with ChunkError.
pub type ChunkResult<T> = Result<T, ChunkError>;
