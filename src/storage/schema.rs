//! Database schema definitions
//!
//! This module contains all SQL schema definitions for the dataset store.

/// SQL schema for the database
pub const SCHEMA_SQL: &str = r#"
-- One row per open session dataset
CREATE TABLE IF NOT EXISTS datasets (
    name TEXT PRIMARY KEY,
    session_id TEXT NOT NULL,
    created_at TEXT NOT NULL
);

-- One row per appended page result, in append order
CREATE TABLE IF NOT EXISTS dataset_pages (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    dataset TEXT NOT NULL REFERENCES datasets(name) ON DELETE CASCADE,
    page_url TEXT NOT NULL,
    appended_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_dataset_pages_dataset ON dataset_pages(dataset);

-- Videos of each page, in DOM order
CREATE TABLE IF NOT EXISTS dataset_videos (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    page_id INTEGER NOT NULL REFERENCES dataset_pages(id) ON DELETE CASCADE,
    position INTEGER NOT NULL,
    title TEXT NOT NULL,
    views INTEGER NOT NULL,
    thumbnail TEXT NOT NULL,
    UNIQUE(page_id, position)
);

CREATE INDEX IF NOT EXISTS idx_dataset_videos_page ON dataset_videos(page_id);
"#;

/// Initializes the database schema
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}
