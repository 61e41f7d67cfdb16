//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the DatasetStore trait.

use crate::state::SessionId;
use crate::storage::schema::initialize_schema;
use crate::storage::traits::{DatasetHandle, DatasetStore, StorageError, StorageResult};
use crate::storage::{PageResult, VideoRecord};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

/// SQLite storage backend
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Opens (or creates) a database at the given path
    ///
    /// `:memory:` opens a private in-memory database.
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteStorage)` - Successfully opened/created database
    /// * `Err(StorageError)` - Failed to open database
    pub fn new(path: &Path) -> StorageResult<Self> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database
    pub fn new_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }

    /// Opens the database named by `storage.database-path`
    pub fn open(database_path: &str) -> StorageResult<Self> {
        if database_path == ":memory:" {
            Self::new_in_memory()
        } else {
            Self::new(Path::new(database_path))
        }
    }

    /// Returns true if the dataset currently exists
    pub fn dataset_exists(&self, name: &str) -> StorageResult<bool> {
        let found: Option<String> = self
            .conn
            .query_row(
                "SELECT name FROM datasets WHERE name = ?1",
                params![name],
                |row| row.get(0),
            )
            .optional()?;
        Ok(found.is_some())
    }

    /// Counts open datasets
    pub fn count_datasets(&self) -> StorageResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM datasets", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    fn require_dataset(&self, handle: &DatasetHandle) -> StorageResult<()> {
        if self.dataset_exists(&handle.name)? {
            Ok(())
        } else {
            Err(StorageError::DatasetNotFound(handle.name.clone()))
        }
    }
}

impl DatasetStore for SqliteStorage {
    fn open_dataset(&mut self, session_id: SessionId) -> StorageResult<DatasetHandle> {
        let handle = DatasetHandle::for_session(session_id);

        if self.dataset_exists(&handle.name)? {
            return Err(StorageError::DatasetExists(handle.name));
        }

        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO datasets (name, session_id, created_at) VALUES (?1, ?2, ?3)",
            params![handle.name, session_id.to_string(), now],
        )?;

        Ok(handle)
    }

    fn append(&mut self, handle: &DatasetHandle, page: &PageResult) -> StorageResult<()> {
        self.require_dataset(handle)?;

        let now = Utc::now().to_rfc3339();
        let tx = self.conn.transaction()?;

        tx.execute(
            "INSERT INTO dataset_pages (dataset, page_url, appended_at) VALUES (?1, ?2, ?3)",
            params![handle.name, page.page_url, now],
        )?;
        let page_id = tx.last_insert_rowid();

        {
            let mut stmt = tx.prepare(
                "INSERT INTO dataset_videos (page_id, position, title, views, thumbnail)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )?;
            for (position, video) in page.videos.iter().enumerate() {
                let views = i64::try_from(video.views)
                    .map_err(|_| StorageError::ViewsOutOfRange(video.views))?;
                stmt.execute(params![
                    page_id,
                    position as i64,
                    video.title,
                    views,
                    video.thumbnail
                ])?;
            }
        }

        tx.commit()?;
        Ok(())
    }

    fn read_all(&self, handle: &DatasetHandle) -> StorageResult<Vec<PageResult>> {
        self.require_dataset(handle)?;

        let mut pages_stmt = self
            .conn
            .prepare("SELECT id, page_url FROM dataset_pages WHERE dataset = ?1 ORDER BY id")?;
        let page_rows = pages_stmt
            .query_map(params![handle.name], |row| {
                Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let mut videos_stmt = self.conn.prepare(
            "SELECT title, views, thumbnail FROM dataset_videos
             WHERE page_id = ?1 ORDER BY position",
        )?;

        let mut pages = Vec::with_capacity(page_rows.len());
        for (page_id, page_url) in page_rows {
            let videos = videos_stmt
                .query_map(params![page_id], |row| {
                    Ok(VideoRecord {
                        title: row.get(0)?,
                        views: {
                            let views: i64 = row.get(1)?;
                            u64::try_from(views)
                                .map_err(|_| rusqlite::Error::IntegralValueOutOfRange(1, views))?
                        },
                        thumbnail: row.get(2)?,
                    })
                })?
                .collect::<Result<Vec<_>, _>>()?;
            pages.push(PageResult { page_url, videos });
        }

        Ok(pages)
    }

    fn drop_dataset(&mut self, handle: &DatasetHandle) -> StorageResult<()> {
        let tx = self.conn.transaction()?;
        tx.execute(
            "DELETE FROM dataset_videos WHERE page_id IN
             (SELECT id FROM dataset_pages WHERE dataset = ?1)",
            params![handle.name],
        )?;
        tx.execute(
            "DELETE FROM dataset_pages WHERE dataset = ?1",
            params![handle.name],
        )?;
        tx.execute("DELETE FROM datasets WHERE name = ?1", params![handle.name])?;
        tx.commit()?;
        Ok(())
    }
}
