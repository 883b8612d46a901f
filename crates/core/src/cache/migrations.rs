//! Schema versions for the document cache.
//!
//! `_migrations` records one row per applied version. Opening a database
//! applies every version above the highest recorded one, each inside its
//! own transaction.

use super::Error;
use tokio_rusqlite::{Connection, params, rusqlite};

/// Ordered (version, SQL) pairs. Versions are strictly increasing.
const MIGRATIONS: &[(i64, &str)] = &[(1, include_str!("../../migrations/001_documents.sql"))];

/// Bring the schema up to the latest version.
pub async fn run(conn: &Connection) -> Result<(), Error> {
    conn.call(|conn| -> Result<(), Error> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS _migrations (
                version INTEGER PRIMARY KEY,
                applied_at TEXT NOT NULL
            )",
        )?;

        let current = schema_version(conn)?;
        for &(version, sql) in MIGRATIONS.iter().filter(|(v, _)| *v > current) {
            tracing::info!(version, "applying cache migration");
            let tx = conn.transaction()?;
            tx.execute_batch(sql)
                .map_err(|e| Error::MigrationFailed(format!("version {version}: {e}")))?;
            tx.execute(
                "INSERT INTO _migrations (version, applied_at) VALUES (?1, ?2)",
                params![version, chrono::Utc::now().to_rfc3339()],
            )?;
            tx.commit()?;
        }

        Ok(())
    })
    .await
    .map_err(Error::from)
}

fn schema_version(conn: &rusqlite::Connection) -> Result<i64, Error> {
    let version = conn.query_row("SELECT COALESCE(MAX(version), 0) FROM _migrations", [], |row| row.get(0))?;
    Ok(version)
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn migrated() -> Connection {
        let conn = Connection::open_in_memory().await.unwrap();
        run(&conn).await.unwrap();
        conn
    }

    #[tokio::test]
    async fn test_rerun_keeps_latest_version() {
        let conn = migrated().await;
        run(&conn).await.unwrap();

        let (rows, version): (i64, i64) = conn
            .call(|conn| {
                conn.query_row("SELECT COUNT(*), MAX(version) FROM _migrations", [], |row| {
                    Ok((row.get(0)?, row.get(1)?))
                })
            })
            .await
            .unwrap();

        let latest = MIGRATIONS.last().map(|(v, _)| *v).unwrap();
        assert_eq!(rows, MIGRATIONS.len() as i64);
        assert_eq!(version, latest);
    }

    #[tokio::test]
    async fn test_fetched_at_index_created() {
        let conn = migrated().await;

        let has_index: bool = conn
            .call(|conn| {
                conn.query_row(
                    "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='index' AND name='idx_documents_fetched_at')",
                    [],
                    |row| row.get(0),
                )
            })
            .await
            .unwrap();

        assert!(has_index);
    }

    #[tokio::test]
    async fn test_documents_reject_id_zero() {
        let conn = migrated().await;

        let inserted = conn
            .call(|conn| {
                conn.execute(
                    "INSERT INTO documents (id, source_url, created_at, updated_at) VALUES (?1, ?2, ?3, ?3)",
                    params![0, "https://docs.google.com/document/d/x/export", "2025-01-01T00:00:00Z"],
                )
            })
            .await;

        assert!(inserted.is_err());
    }

    #[tokio::test]
    async fn test_new_document_has_no_cached_content() {
        let conn = migrated().await;

        let (content, fetched_at): (Option<String>, Option<String>) = conn
            .call(|conn| {
                conn.execute(
                    "INSERT INTO documents (id, source_url, created_at, updated_at) VALUES (1, ?1, ?2, ?2)",
                    params!["https://docs.google.com/document/d/x/export", "2025-01-01T00:00:00Z"],
                )?;
                conn.query_row("SELECT content, fetched_at FROM documents WHERE id = 1", [], |row| {
                    Ok((row.get(0)?, row.get(1)?))
                })
            })
            .await
            .unwrap();

        assert_eq!(content, None);
        assert_eq!(fetched_at, None);
    }
}
