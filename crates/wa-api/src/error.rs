//! Error types for wa-api

use thiserror::Error;

/// wa-api error type
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Session not found: {0}")]
    SessionNotFound(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Core error: {0}")]
    Core(#[from] wa_core::Error),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, ApiError>;
