//! Error types for the loader.

use thiserror::Error;

/// Errors that can occur while talking to the store.
#[derive(Error, Debug)]
pub enum LoaderError {
    /// Could not establish a connection.
    #[error("Connection error: {0}")]
    Connection(String),

    /// MySQL statement error.
    #[error("MySQL error: {0}")]
    MySQL(#[from] mysql_async::Error),

    /// Commit of the open transaction failed.
    #[error("Commit failed: {0}")]
    Commit(String),

    /// The connection was already closed.
    #[error("Store is closed")]
    Closed,

    /// Chunk size must be positive.
    #[error("Invalid chunk size: {0}")]
    InvalidChunkSize(usize),

    /// A chunk would need more bound parameters than MySQL accepts.
    #[error(
        "Chunk of {rows} rows into '{table}' needs {placeholders} placeholders (limit {limit})"
    )]
    TooManyPlaceholders {
        table: &'static str,
        rows: usize,
        placeholders: usize,
        limit: usize,
    },

    /// Any other store failure.
    #[error("Store error: {0}")]
    Store(String),
}
