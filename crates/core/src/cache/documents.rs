//! Document registry and content storage on SQLite.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio_rusqlite::params;
use tokio_rusqlite::rusqlite;

use super::connection::CacheDb;
use super::hash::content_digest;
use crate::Error;
use crate::store::{DocId, DocumentEntry, DocumentStore, RecordOutcome, format_timestamp};

#[async_trait]
impl DocumentStore for CacheDb {
    async fn list_sources(&self) -> Result<BTreeMap<DocId, String>, Error> {
        self.conn
            .call(|conn| -> Result<BTreeMap<DocId, String>, Error> {
                let mut stmt = conn.prepare("SELECT id, source_url FROM documents ORDER BY id ASC")?;
                let rows = stmt.query_map([], |row| Ok((row.get::<_, DocId>(0)?, row.get::<_, String>(1)?)))?;

                let mut sources = BTreeMap::new();
                for row in rows {
                    let (id, url) = row?;
                    sources.insert(id, url);
                }
                Ok(sources)
            })
            .await
            .map_err(Error::from)
    }

    async fn upsert_source(&self, id: DocId, url: &str) -> Result<(), Error> {
        let url = url.to_string();
        let now = format_timestamp(Utc::now());
        self.conn
            .call(move |conn| -> Result<(), Error> {
                conn.execute(
                    "INSERT INTO documents (id, source_url, created_at, updated_at)
                    VALUES (?1, ?2, ?3, ?3)
                    ON CONFLICT(id) DO UPDATE SET
                        source_url = excluded.source_url,
                        updated_at = excluded.updated_at",
                    params![id, url, now],
                )?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }

    async fn remove_document(&self, id: DocId) -> Result<bool, Error> {
        self.conn
            .call(move |conn| -> Result<bool, Error> {
                let count = conn.execute("DELETE FROM documents WHERE id = ?1", params![id])?;
                Ok(count > 0)
            })
            .await
            .map_err(Error::from)
    }

    async fn get_document(&self, id: DocId) -> Result<Option<DocumentEntry>, Error> {
        self.conn
            .call(move |conn| -> Result<Option<DocumentEntry>, Error> {
                let mut stmt = conn.prepare(
                    "SELECT id, source_url, content, content_sha256, fetched_at, created_at, updated_at
                    FROM documents WHERE id = ?1",
                )?;

                let result = stmt.query_row(params![id], |row| {
                    Ok(DocumentEntry {
                        id: row.get(0)?,
                        source_url: row.get(1)?,
                        content: row.get(2)?,
                        content_sha256: row.get(3)?,
                        fetched_at: row.get(4)?,
                        created_at: row.get(5)?,
                        updated_at: row.get(6)?,
                    })
                });

                match result {
                    Ok(entry) => Ok(Some(entry)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e.into()),
                }
            })
            .await
            .map_err(Error::from)
    }

    async fn record_success(
        &self, id: DocId, content: &str, fetched_at: DateTime<Utc>,
    ) -> Result<RecordOutcome, Error> {
        let content = content.to_string();
        let digest = content_digest(&content);
        let fetched_at = format_timestamp(fetched_at);

        self.conn
            .call(move |conn| -> Result<RecordOutcome, Error> {
                let previous = conn.query_row(
                    "SELECT content_sha256 FROM documents WHERE id = ?1",
                    params![id],
                    |row| row.get::<_, Option<String>>(0),
                );

                let outcome = match previous {
                    Ok(Some(prev)) if prev == digest => RecordOutcome::Unchanged,
                    Ok(_) => RecordOutcome::Changed,
                    Err(rusqlite::Error::QueryReturnedNoRows) => return Ok(RecordOutcome::Missing),
                    Err(e) => return Err(e.into()),
                };

                conn.execute(
                    "UPDATE documents SET content = ?2, content_sha256 = ?3, fetched_at = ?4 WHERE id = ?1",
                    params![id, content, digest, fetched_at],
                )?;

                Ok(outcome)
            })
            .await
            .map_err(Error::from)
    }
}
