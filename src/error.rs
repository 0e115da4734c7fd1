// src/error.rs

use thiserror::Error;

/// Core error types for Appdex
#[derive(Error, Debug)]
pub enum Error {
    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Database initialization error
    #[error("Failed to initialize database: {0}")]
    InitError(String),

    /// Database not found
    #[error("Database not found at path: {0}")]
    DatabaseNotFound(String),

    /// Remote fetch failure (HTTP status, transport, timeout)
    #[error("Download error: {0}")]
    DownloadError(String),

    /// Unparseable upstream payload
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Lookup miss for an entity the caller named explicitly
    #[error("Not found: {0}")]
    NotFoundError(String),
}

/// Result type alias using Appdex's Error type
pub type Result<T> = std::result::Result<T, Error>;
