//! Storage layer for the photocap persistence service.
//!
//! The collection is append-only: the HTTP surface can only add records.
//! `count` and `recent` exist for startup logging and tests.

pub mod schema;

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::error::{Error, Result};

/// A record persisted by the write endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedImage {
    /// Row identifier assigned by the store.
    pub id: i64,
    /// The image payload as received.
    pub data: String,
    /// Creation time, assigned by the service at write time.
    pub timestamp: DateTime<Utc>,
}

/// The append-only collection behind the write endpoint.
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Append one image payload. The timestamp is assigned here, at write
    /// time, never by the client.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying store rejects the write.
    async fn save(&self, data: &str) -> Result<SavedImage>;

    /// Number of records in the collection.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying query fails.
    async fn count(&self) -> Result<i64>;

    /// Most recent records, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying query fails.
    async fn recent(&self, limit: usize) -> Result<Vec<SavedImage>>;
}

/// `SQLite`-backed image collection.
#[derive(Debug)]
pub struct SqliteImageStore {
    /// Path to the database file.
    path: PathBuf,
    /// Database connection, serialized behind an async mutex.
    conn: Mutex<Connection>,
}

impl SqliteImageStore {
    /// Open or create the collection at the given path.
    ///
    /// Creates the parent directories and database file if they don't
    /// exist, and initializes the schema.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or schema
    /// initialization fails.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        debug!("Opening database at {}", path.display());
        let conn = Connection::open(&path).map_err(|source| Error::DatabaseOpen {
            path: path.clone(),
            source,
        })?;

        // WAL keeps concurrent readers out of the writer's way
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;

        Self::initialize_schema(&conn)?;

        info!("Database opened successfully at {}", path.display());
        Ok(Self {
            path,
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory collection for testing.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be created.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|source| Error::DatabaseOpen {
            path: PathBuf::from(":memory:"),
            source,
        })?;

        Self::initialize_schema(&conn)?;

        Ok(Self {
            path: PathBuf::from(":memory:"),
            conn: Mutex::new(conn),
        })
    }

    /// Get the path to the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn initialize_schema(conn: &Connection) -> Result<()> {
        for statement in schema::SCHEMA_STATEMENTS {
            conn.execute(statement, [])?;
        }
        Ok(())
    }

    /// Convert a database row to a `SavedImage`.
    fn row_to_image(row: &rusqlite::Row) -> rusqlite::Result<SavedImage> {
        let id: i64 = row.get(0)?;
        let data: String = row.get(1)?;
        let timestamp_str: String = row.get(2)?;

        let timestamp = DateTime::parse_from_rfc3339(&timestamp_str)
            .map_or_else(|_| Utc::now(), |dt| dt.with_timezone(&Utc));

        Ok(SavedImage {
            id,
            data,
            timestamp,
        })
    }
}

#[async_trait]
impl ImageStore for SqliteImageStore {
    async fn save(&self, data: &str) -> Result<SavedImage> {
        let timestamp = Utc::now();
        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT INTO images (data, timestamp) VALUES (?1, ?2)",
            params![data, timestamp.to_rfc3339()],
        )?;

        let id = conn.last_insert_rowid();
        debug!("Saved image {} ({} bytes)", id, data.len());
        Ok(SavedImage {
            id,
            data: data.to_string(),
            timestamp,
        })
    }

    async fn count(&self) -> Result<i64> {
        let conn = self.conn.lock().await;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM images", [], |row| row.get(0))?;
        Ok(count)
    }

    async fn recent(&self, limit: usize) -> Result<Vec<SavedImage>> {
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare(
            r"
            SELECT id, data, timestamp
            FROM images ORDER BY id DESC LIMIT ?1
            ",
        )?;

        let limit_i64 = i64::try_from(limit).unwrap_or(i64::MAX);
        let images = stmt
            .query_map([limit_i64], Self::row_to_image)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(images)
    }
}
