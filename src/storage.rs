use crate::error::{AppError, Result};
use crate::types::ScrapedRecord;
use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;

/// Holds the single current scraped record
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Overwrite the current record, creating it if none exists.
    async fn replace(&self, record: &ScrapedRecord) -> Result<()>;
    /// The most recently stored record, `None` before the first scrape.
    async fn current(&self) -> Result<Option<ScrapedRecord>>;
    /// Number of stored records; never more than one.
    async fn count(&self) -> Result<usize>;
}

/// In-memory store for development/testing
#[derive(Default)]
pub struct InMemoryRecordStore {
    record: Arc<Mutex<Option<ScrapedRecord>>>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self) -> Result<MutexGuard<'_, Option<ScrapedRecord>>> {
        self.record.lock().map_err(|_| AppError::Database {
            message: "record store lock poisoned".to_string(),
        })
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn replace(&self, record: &ScrapedRecord) -> Result<()> {
        *self.slot()? = Some(record.clone());
        debug!("Replaced in-memory record: {}", record.news_title);
        Ok(())
    }

    async fn current(&self) -> Result<Option<ScrapedRecord>> {
        Ok(self.slot()?.clone())
    }

    async fn count(&self) -> Result<usize> {
        Ok(usize::from(self.slot()?.is_some()))
    }
}

/// Document collection in a local SQLite file.
///
/// The record is kept as a JSON document in a table whose primary key can
/// only take one value, so an upsert against that key replaces "any document".
pub struct SqliteRecordStore {
    conn: Mutex<Connection>,
}

const SINGLETON_ID: i64 = 1;

impl SqliteRecordStore {
    pub fn open<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        if let Some(parent) = db_path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(db_path.as_ref())?;
        Self::with_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS mars (
                id          INTEGER PRIMARY KEY CHECK (id = 1),
                document    TEXT NOT NULL,
                updated_at  TEXT NOT NULL
            );
            "#,
        )?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| AppError::Database {
            message: "record store connection lock poisoned".to_string(),
        })
    }
}

#[async_trait]
impl RecordStore for SqliteRecordStore {
    async fn replace(&self, record: &ScrapedRecord) -> Result<()> {
        let document = serde_json::to_string(record)?;
        self.conn()?.execute(
            "INSERT INTO mars (id, document, updated_at) VALUES (?1, ?2, datetime('now'))
             ON CONFLICT(id) DO UPDATE SET document=excluded.document, updated_at=excluded.updated_at",
            params![SINGLETON_ID, document],
        )?;
        debug!("Replaced stored record: {}", record.news_title);
        Ok(())
    }

    async fn current(&self) -> Result<Option<ScrapedRecord>> {
        let document: Option<String> = self
            .conn()?
            .query_row(
                "SELECT document FROM mars WHERE id = ?1",
                params![SINGLETON_ID],
                |row| row.get(0),
            )
            .optional()?;

        match document {
            Some(doc) => Ok(Some(serde_json::from_str(&doc)?)),
            None => Ok(None),
        }
    }

    async fn count(&self) -> Result<usize> {
        let n: i64 = self
            .conn()?
            .query_row("SELECT COUNT(*) FROM mars", [], |row| row.get(0))?;
        Ok(n as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::HemisphereImage;

    fn record(title: &str) -> ScrapedRecord {
        ScrapedRecord {
            news_title: title.to_string(),
            news_paragraph: "teaser".to_string(),
            featured_image_url: "https://www.jpl.nasa.gov/spaceimages/images/mediumsize/PIA1_ip.jpg"
                .to_string(),
            featured_full_size_url:
                "https://www.jpl.nasa.gov/spaceimages/images/wallpaper/PIA1-1920x1200.jpg"
                    .to_string(),
            mars_facts: "<table></table>".to_string(),
            hemisphere_image: vec![HemisphereImage {
                title: "Cerberus Hemisphere Enhanced".to_string(),
                img_url: "https://astrogeology.usgs.gov/cerberus.jpg".to_string(),
            }],
        }
    }

    #[tokio::test]
    async fn empty_store_has_no_current_record() {
        let store = SqliteRecordStore::open_in_memory().unwrap();
        assert_eq!(store.current().await.unwrap(), None);
        assert_eq!(store.count().await.unwrap(), 0);

        let memory = InMemoryRecordStore::new();
        assert_eq!(memory.current().await.unwrap(), None);
        assert_eq!(memory.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn replace_overwrites_single_document() {
        let store = SqliteRecordStore::open_in_memory().unwrap();
        store.replace(&record("first")).await.unwrap();
        store.replace(&record("second")).await.unwrap();

        assert_eq!(store.count().await.unwrap(), 1);
        assert_eq!(store.current().await.unwrap(), Some(record("second")));
    }

    #[tokio::test]
    async fn in_memory_replace_overwrites() {
        let store = InMemoryRecordStore::new();
        store.replace(&record("first")).await.unwrap();
        store.replace(&record("second")).await.unwrap();

        assert_eq!(store.count().await.unwrap(), 1);
        assert_eq!(store.current().await.unwrap(), Some(record("second")));
    }

    #[tokio::test]
    async fn record_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("mars.db");

        SqliteRecordStore::open(&path)
            .unwrap()
            .replace(&record("persisted"))
            .await
            .unwrap();

        let reopened = SqliteRecordStore::open(&path).unwrap();
        assert_eq!(reopened.current().await.unwrap(), Some(record("persisted")));
    }
}
