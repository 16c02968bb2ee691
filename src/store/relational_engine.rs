//! Relational Storage Engine
//!
//! libSQL-backed SQL engine. The connection string selects a local file, an
//! in-memory database, or a remote server. The schema is ensured once at
//! construction; after that, every operation issues its own auto-committed
//! statements, and no transaction spans operations.

use std::path::Path;

use async_trait::async_trait;
use libsql::{params, Builder, Connection, Database as LibSqlDatabase};
use tracing::{debug, info};

use super::traits::{IgnoredItem, StorageEngine, StoreResult};

/// Relational storage engine
///
/// Rows are one-per-library in the legacy-named `deleted_size` table
/// (`library_name` is the primary key) and one-per-key in `ignored_items`
/// (`key` is the primary key).
///
/// Holds a single connection created at construction. `libsql::Connection`
/// is `Send + Sync` and safe for concurrent async use; each statement
/// commits on its own.
pub struct RelationalEngine {
    #[allow(dead_code)]
    db: LibSqlDatabase,
    conn: Connection,
}

impl RelationalEngine {
    /// Connect to the database named by `url` and ensure the schema exists.
    ///
    /// `sqlite://`-prefixed URLs and bare paths open local files, `:memory:`
    /// opens an in-memory database, and `libsql://`/`http(s)://` URLs open a
    /// remote server (pass the server token as `auth_token`).
    pub async fn connect(url: &str, auth_token: Option<&str>) -> StoreResult<Self> {
        let db = if url.starts_with("libsql://")
            || url.starts_with("http://")
            || url.starts_with("https://")
        {
            Builder::new_remote(
                url.to_string(),
                auth_token.unwrap_or_default().to_string(),
            )
            .build()
            .await?
        } else {
            let path = url.strip_prefix("sqlite://").unwrap_or(url);
            if path != ":memory:" {
                if let Some(parent) = Path::new(path).parent() {
                    if !parent.as_os_str().is_empty() {
                        std::fs::create_dir_all(parent)?;
                    }
                }
            }
            Builder::new_local(path).build().await?
        };

        let conn = db.connect()?;
        let engine = Self { db, conn };
        engine.ensure_schema().await?;
        info!(url, "Relational store opened");
        Ok(engine)
    }

    /// Get the connection.
    fn conn(&self) -> &Connection {
        &self.conn
    }

    async fn ensure_schema(&self) -> StoreResult<()> {
        let conn = self.conn();
        conn.execute(
            "CREATE TABLE IF NOT EXISTS deleted_size (
                library_name TEXT PRIMARY KEY,
                deleted_size INTEGER NOT NULL
            )",
            (),
        )
        .await?;
        conn.execute(
            "CREATE TABLE IF NOT EXISTS ignored_items (
                key TEXT PRIMARY KEY
            )",
            (),
        )
        .await?;
        Ok(())
    }
}

#[async_trait]
impl StorageEngine for RelationalEngine {
    fn engine_type(&self) -> &'static str {
        "relational"
    }

    async fn set_deleted_size(&self, library_name: &str, deleted_size: u64) -> StoreResult<()> {
        let conn = self.conn();
        let updated = conn
            .execute(
                "UPDATE deleted_size SET deleted_size = ?1 WHERE library_name = ?2",
                params![deleted_size as i64, library_name],
            )
            .await?;
        if updated == 0 {
            conn.execute(
                "INSERT INTO deleted_size (library_name, deleted_size) VALUES (?1, ?2)",
                params![library_name, deleted_size as i64],
            )
            .await?;
        }
        debug!(library = library_name, bytes = deleted_size, "Deleted size recorded");
        Ok(())
    }

    async fn get_deleted_size(&self, library_name: &str) -> StoreResult<u64> {
        let conn = self.conn();
        let mut rows = conn
            .query(
                "SELECT deleted_size FROM deleted_size WHERE library_name = ?1",
                params![library_name],
            )
            .await?;

        match rows.next().await? {
            Some(row) => Ok(row.get::<i64>(0)? as u64),
            None => Ok(0),
        }
    }

    async fn get_ignored_item(&self, key: &str) -> StoreResult<Option<IgnoredItem>> {
        let conn = self.conn();
        let mut rows = conn
            .query(
                "SELECT key FROM ignored_items WHERE key = ?1",
                params![key],
            )
            .await?;

        match rows.next().await? {
            Some(row) => Ok(Some(IgnoredItem::new(row.get::<String>(0)?))),
            None => Ok(None),
        }
    }

    async fn add_ignored_item(&self, key: &str) -> StoreResult<()> {
        let conn = self.conn();
        conn.execute(
            "INSERT INTO ignored_items (key) VALUES (?1) ON CONFLICT (key) DO NOTHING",
            params![key],
        )
        .await?;
        debug!(key, "Ignored item added");
        Ok(())
    }

    async fn remove_ignored_item(&self, key: &str) -> StoreResult<()> {
        let conn = self.conn();
        let removed = conn
            .execute("DELETE FROM ignored_items WHERE key = ?1", params![key])
            .await?;
        if removed > 0 {
            debug!(key, "Ignored item removed");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn engine() -> RelationalEngine {
        RelationalEngine::connect(":memory:", None).await.unwrap()
    }

    #[tokio::test]
    async fn test_unwritten_library_reads_zero() {
        let db = engine().await;
        assert_eq!(db.get_deleted_size("movies").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_set_then_get_deleted_size() {
        let db = engine().await;

        db.set_deleted_size("movies", 100).await.unwrap();
        assert_eq!(db.get_deleted_size("movies").await.unwrap(), 100);

        // Overwrite, not accumulate.
        db.set_deleted_size("movies", 200).await.unwrap();
        assert_eq!(db.get_deleted_size("movies").await.unwrap(), 200);
    }

    #[tokio::test]
    async fn test_multi_library_isolation() {
        let db = engine().await;

        db.set_deleted_size("lib1", 100).await.unwrap();
        db.set_deleted_size("lib2", 50).await.unwrap();

        assert_eq!(db.get_deleted_size("lib1").await.unwrap(), 100);
        assert_eq!(db.get_deleted_size("lib2").await.unwrap(), 50);
    }

    #[tokio::test]
    async fn test_ignored_item_lifecycle() {
        let db = engine().await;

        assert!(db.get_ignored_item("k1").await.unwrap().is_none());

        db.add_ignored_item("k1").await.unwrap();
        let item = db.get_ignored_item("k1").await.unwrap().unwrap();
        assert_eq!(item.key, "k1");

        db.remove_ignored_item("k1").await.unwrap();
        assert!(db.get_ignored_item("k1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_add_is_idempotent() {
        let db = engine().await;

        db.add_ignored_item("k1").await.unwrap();
        db.add_ignored_item("k1").await.unwrap();

        db.remove_ignored_item("k1").await.unwrap();
        assert!(db.get_ignored_item("k1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_remove_nonexistent_is_noop() {
        let db = engine().await;
        db.remove_ignored_item("nonexistent").await.unwrap();
    }

    #[tokio::test]
    async fn test_local_file_database() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("store.sqlite");
        let url = format!("sqlite://{}", path.display());

        {
            let db = RelationalEngine::connect(&url, None).await.unwrap();
            db.set_deleted_size("movies", 42).await.unwrap();
        }

        // Reconnecting reads the same file.
        let db = RelationalEngine::connect(&url, None).await.unwrap();
        assert_eq!(db.get_deleted_size("movies").await.unwrap(), 42);
        assert!(path.exists());
    }
}
