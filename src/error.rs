//! Error taxonomy for the catalog store.

use thiserror::Error;

/// Every failure the catalog store reports to its callers.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CatalogError {
    /// An operation ran before a successful `initialize` (or after `close`).
    #[error("Database not initialized")]
    NotInitialized,

    /// The engine could not open or create the database file.
    #[error("failed to open database at {path}: {message}")]
    Open { path: String, message: String },

    /// A pragma or table-creation statement failed.
    #[error("{0}")]
    Schema(String),

    /// Prepare or step failure of a data statement, engine text verbatim.
    #[error("{0}")]
    Statement(String),

    /// A sort expression outside the permitted set.
    #[error("unsupported sort expression: {0:?}")]
    InvalidSort(String),

    /// Configuration could not be read or parsed.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl CatalogError {
    pub(crate) fn statement(err: &rusqlite::Error) -> Self {
        Self::Statement(engine_message(err))
    }

    pub(crate) fn schema(err: &rusqlite::Error) -> Self {
        Self::Schema(engine_message(err))
    }
}

/// Text of an engine error as SQLite reports it.
pub(crate) fn engine_message(err: &rusqlite::Error) -> String {
    err.to_string()
}

pub type Result<T> = std::result::Result<T, CatalogError>;
