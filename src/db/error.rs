//! Failure taxonomy for the persistence layer. Callers surface these as
//! alert dialogs; there is no retry policy anywhere, so each variant
//! represents a whole operation that either fully succeeded or fully failed.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Convenience alias used by every store function.
pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    /// The database file could not be opened or its schema could not be
    /// bootstrapped. Fatal to the caller.
    #[error("failed to open plant database at {path}: {source}")]
    Connection {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },
    /// The application data directory could not be created or located.
    #[error("failed to prepare data directory: {0}")]
    DataDir(#[from] io::Error),
    /// A read or write statement failed after the connection was up.
    #[error("database statement failed: {0}")]
    Storage(#[from] rusqlite::Error),
    /// An update targeted a plant id that no longer exists.
    #[error("plant {0} not found")]
    PlantNotFound(i64),
    /// A rename targeted a category name that no longer exists.
    #[error("category {0:?} not found")]
    CategoryNotFound(String),
    /// An insert or rename collided with an existing category name.
    #[error("category {0:?} already exists")]
    CategoryExists(String),
}
