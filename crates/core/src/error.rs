//! Unified error types for docmirror.
//!
//! Per-document fetch problems are not errors at this level; they are
//! reported through the refresh report. This type covers the store, the
//! registry and the admin surface.

use rmcp::model::{ErrorCode, ErrorData as McpError};
use tokio_rusqlite::rusqlite;

use crate::store::DocId;

/// Unified error types for the docmirror service.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid input parameters (e.g., id 0, blank URL).
    #[error("INVALID_INPUT: {0}")]
    InvalidInput(String),

    /// No document registered under the given id.
    #[error("NOT_FOUND: no document registered as #{0}")]
    DocumentNotFound(DocId),

    /// Database operation failed.
    #[error("CACHE_ERROR: {0}")]
    Database(tokio_rusqlite::Error),

    /// Migration failed to apply.
    #[error("CACHE_ERROR: migration failed: {0}")]
    MigrationFailed(String),

    /// The HTTP client could not be constructed.
    #[error("HTTP_CLIENT: {0}")]
    HttpClient(String),

    /// Configuration could not be loaded or is invalid.
    #[error("CONFIG_ERROR: {0}")]
    Config(#[from] crate::config::ConfigError),
}

impl From<tokio_rusqlite::Error<Error>> for Error {
    fn from(err: tokio_rusqlite::Error<Error>) -> Self {
        match err {
            tokio_rusqlite::Error::Error(e) => e,
            tokio_rusqlite::Error::ConnectionClosed => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
            tokio_rusqlite::Error::Close(c) => Error::Database(tokio_rusqlite::Error::Close(c)),
            _ => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
        }
    }
}

impl From<tokio_rusqlite::Error<rusqlite::Error>> for Error {
    fn from(err: tokio_rusqlite::Error<rusqlite::Error>) -> Self {
        Error::Database(err)
    }
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Error::Database(tokio_rusqlite::Error::Error(err))
    }
}

impl From<Error> for McpError {
    fn from(err: Error) -> Self {
        let (code, message) = match &err {
            Error::InvalidInput(msg) => (-32602, msg.clone()),
            Error::DocumentNotFound(_) => (-32001, err.to_string()),
            Error::Database(e) => (-32002, e.to_string()),
            Error::MigrationFailed(msg) => (-32002, msg.clone()),
            Error::HttpClient(msg) => (-32003, msg.clone()),
            Error::Config(e) => (-32004, e.to_string()),
        };

        McpError { code: ErrorCode(code), message: message.into(), data: None }
    }
}
