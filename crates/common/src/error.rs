//! Error types shared across Glidecursor crates.

use std::path::PathBuf;

/// Top-level error type for Glidecursor operations.
#[derive(Debug, thiserror::Error)]
pub enum GlideError {
    #[error("Matcher error: {message}")]
    Matcher { message: String },

    #[error("Element tree error: {message}")]
    Tree { message: String },

    #[error("Trace error: {message}")]
    Trace { message: String },

    #[error("Pointer source error: {message}")]
    Source { message: String },

    #[error("Surface error: {message}")]
    Surface { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Unsupported operation: {message}")]
    Unsupported { message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using GlideError.
pub type GlideResult<T> = Result<T, GlideError>;

impl GlideError {
    pub fn matcher(msg: impl Into<String>) -> Self {
        Self::Matcher {
            message: msg.into(),
        }
    }

    pub fn tree(msg: impl Into<String>) -> Self {
        Self::Tree {
            message: msg.into(),
        }
    }

    pub fn trace(msg: impl Into<String>) -> Self {
        Self::Trace {
            message: msg.into(),
        }
    }

    pub fn source(msg: impl Into<String>) -> Self {
        Self::Source {
            message: msg.into(),
        }
    }

    pub fn surface(msg: impl Into<String>) -> Self {
        Self::Surface {
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }
}
