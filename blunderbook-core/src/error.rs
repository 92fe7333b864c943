//! Error types for blunderbook-core

use thiserror::Error;

/// Main error type for the blunderbook-core library
#[derive(Error, Debug)]
pub enum Error {
    /// Database error
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error for the record blob
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Game not found
    #[error("game not found: {0}")]
    GameNotFound(String),

    /// An id prefix matched more than one game
    #[error("ambiguous game id '{0}', use more characters")]
    AmbiguousId(String),
}

/// Result type alias for blunderbook-core
pub type Result<T> = std::result::Result<T, Error>;
