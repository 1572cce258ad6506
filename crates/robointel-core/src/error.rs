//! Error types for robointel.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Input failed validation before any work was attempted (e.g. text too
    /// short to parse). Surfaced to callers as a bad request.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A required provider credential is missing. Surfaced to callers as a
    /// bad request, never retried.
    #[error("Configuration error: {0}")]
    Config(String),

    /// External language-model provider failed (network, HTTP status,
    /// timeout). Retried once by callers that have a fallback.
    #[error("Provider error: {0}")]
    Provider(String),

    /// Provider responded but the payload could not be interpreted. Treated
    /// the same as a provider failure for retry/fallback purposes.
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Duplicate content: hash={0}")]
    DuplicateContent(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
