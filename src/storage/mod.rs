//! Storage module for the ephemeral per-session dataset
//!
//! This module handles:
//! - The typed append log of page results (`DatasetStore`)
//! - SQLite-backed storage, in-memory by default
//! - Scoped ownership of one session's dataset (`DatasetLease`)

mod lease;
mod schema;
mod sqlite;
mod traits;

pub use lease::DatasetLease;
pub use sqlite::SqliteStorage;
pub use traits::{DatasetHandle, DatasetStore, StorageError, StorageResult};

use serde::{Deserialize, Serialize};

/// Metadata for one video, as shown on the playlist page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoRecord {
    /// Trimmed title text, empty when missing
    pub title: String,

    /// Normalized view count
    pub views: u64,

    /// Thumbnail image URL, empty when missing
    pub thumbnail: String,
}

/// The videos extracted from one fetched page, in DOM order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageResult {
    /// The page the videos were extracted from
    pub page_url: String,

    /// Videos in the order they appear on the page
    pub videos: Vec<VideoRecord>,
}
