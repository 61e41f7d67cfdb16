//! Storage traits and error types
//!
//! This module defines the trait interface for dataset backends and
//! associated error types.

use crate::state::SessionId;
use crate::storage::PageResult;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Dataset not found: {0}")]
    DatasetNotFound(String),

    #[error("Dataset already exists: {0}")]
    DatasetExists(String),

    #[error("Dataset already released")]
    DatasetReleased,

    #[error("View count {0} does not fit in the store")]
    ViewsOutOfRange(u64),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Handle to one session's dataset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetHandle {
    /// Dataset name, `playlist-<session id>`
    pub name: String,

    /// Session that owns the dataset
    pub session_id: SessionId,
}

impl DatasetHandle {
    /// Builds the handle naming `session_id`'s dataset
    pub fn for_session(session_id: SessionId) -> Self {
        Self {
            name: session_id.dataset_name(),
            session_id,
        }
    }
}

/// Trait for ephemeral dataset backends
///
/// A dataset is an append-only log of `PageResult`s namespaced by session.
/// Sessions never share a dataset, so isolation is by name.
pub trait DatasetStore: Send {
    /// Creates the dataset for a session
    ///
    /// Fails with `DatasetExists` if the session already has one.
    fn open_dataset(&mut self, session_id: SessionId) -> StorageResult<DatasetHandle>;

    /// Appends one page result to the end of the dataset
    ///
    /// Fails with `DatasetNotFound` if the dataset was never opened or has
    /// been dropped.
    fn append(&mut self, handle: &DatasetHandle, page: &PageResult) -> StorageResult<()>;

    /// Reads every page result in append order
    ///
    /// A dataset with no appended pages yields an empty vector.
    fn read_all(&self, handle: &DatasetHandle) -> StorageResult<Vec<PageResult>>;

    /// Discards the dataset and everything in it
    ///
    /// Dropping a dataset that no longer exists is not an error.
    fn drop_dataset(&mut self, handle: &DatasetHandle) -> StorageResult<()>;
}
