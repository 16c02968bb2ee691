//! High-level storage facade.

use tracing::info;

use super::document_engine::DocumentEngine;
use super::relational_engine::RelationalEngine;
use super::traits::{IgnoredItem, StorageEngine, StoreResult};
use crate::config::StoreConfig;

/// Storage facade over the engine selected at construction.
///
/// A configured connection string selects the relational engine; otherwise
/// the document engine is rooted at the configured directory. The choice is
/// made once and held for the facade's lifetime.
pub struct Database {
    engine: Box<dyn StorageEngine>,
}

impl Database {
    /// Build the facade from resolved configuration.
    pub async fn connect(config: &StoreConfig) -> StoreResult<Self> {
        let engine: Box<dyn StorageEngine> = match config.database_url.as_deref() {
            Some(url) => {
                Box::new(RelationalEngine::connect(url, config.auth_token.as_deref()).await?)
            }
            None => Box::new(DocumentEngine::open(&config.config_dir)?),
        };
        info!(engine = engine.engine_type(), "Storage engine selected");
        Ok(Self { engine })
    }

    /// Build the facade from the process environment.
    pub async fn from_env() -> StoreResult<Self> {
        Self::connect(&StoreConfig::from_env()).await
    }

    /// Engine type name backing this facade ("document" or "relational").
    pub fn engine_type(&self) -> &'static str {
        self.engine.engine_type()
    }

    /// Upsert the cumulative deleted byte count for a library.
    pub async fn set_deleted_size(&self, library_name: &str, deleted_size: u64) -> StoreResult<()> {
        self.engine.set_deleted_size(library_name, deleted_size).await
    }

    /// Stored byte count for a library, or 0 when none has been recorded.
    pub async fn get_deleted_size(&self, library_name: &str) -> StoreResult<u64> {
        self.engine.get_deleted_size(library_name).await
    }

    /// Look up an ignored item by key.
    pub async fn get_ignored_item(&self, key: &str) -> StoreResult<Option<IgnoredItem>> {
        self.engine.get_ignored_item(key).await
    }

    /// Mark a key as ignored; adding an already-ignored key is a no-op.
    pub async fn add_ignored_item(&self, key: &str) -> StoreResult<()> {
        self.engine.add_ignored_item(key).await
    }

    /// Remove a key from the ignored set; a no-op when the key is absent.
    pub async fn remove_ignored_item(&self, key: &str) -> StoreResult<()> {
        self.engine.remove_ignored_item(key).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_selects_document_engine_without_url() {
        let dir = TempDir::new().unwrap();
        let db = Database::connect(&StoreConfig::document(dir.path()))
            .await
            .unwrap();
        assert_eq!(db.engine_type(), "document");
    }

    #[tokio::test]
    async fn test_selects_relational_engine_with_url() {
        let db = Database::connect(&StoreConfig::relational(":memory:"))
            .await
            .unwrap();
        assert_eq!(db.engine_type(), "relational");
    }

    #[tokio::test]
    async fn test_facade_delegates_to_engine() {
        let dir = TempDir::new().unwrap();
        let db = Database::connect(&StoreConfig::document(dir.path()))
            .await
            .unwrap();

        db.set_deleted_size("movies", 7).await.unwrap();
        assert_eq!(db.get_deleted_size("movies").await.unwrap(), 7);

        db.add_ignored_item("k1").await.unwrap();
        assert!(db.get_ignored_item("k1").await.unwrap().is_some());
        db.remove_ignored_item("k1").await.unwrap();
        assert!(db.get_ignored_item("k1").await.unwrap().is_none());
    }
}
