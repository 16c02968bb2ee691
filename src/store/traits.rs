//! Storage Engine Contract
//!
//! Defines the error type, the shared records, and the trait both engines
//! implement.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Result type for storage operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Error type for storage operations
///
/// Engine failures pass through unmodified. This layer adds no taxonomy of
/// its own: callers see the underlying IO, serialization, or database error.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// IO error from the document engine's backing file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed document file
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Relational engine failure (connection, statement, constraint)
    #[error("Database error: {0}")]
    Database(#[from] libsql::Error),

    /// Invalid or incomplete configuration
    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// A content key the surrounding application should skip in future
/// processing passes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IgnoredItem {
    /// Content identifier to skip.
    pub key: String,
}

impl IgnoredItem {
    /// Create a record for `key`.
    pub fn new<S: Into<String>>(key: S) -> Self {
        Self { key: key.into() }
    }
}

/// Core trait for storage engines
///
/// Both engines expose the same logical operations; the facade selects one
/// implementation at construction. Calls are independently persistent: a
/// committed write is visible to subsequent reads from any thread or session.
#[async_trait]
pub trait StorageEngine: Send + Sync {
    /// Get the engine type name ("document" or "relational")
    fn engine_type(&self) -> &'static str;

    /// Upsert the cumulative deleted byte count for a library
    async fn set_deleted_size(&self, library_name: &str, deleted_size: u64) -> StoreResult<()>;

    /// Stored byte count for a library, or 0 when none has been recorded
    async fn get_deleted_size(&self, library_name: &str) -> StoreResult<u64>;

    /// Look up an ignored item by key
    async fn get_ignored_item(&self, key: &str) -> StoreResult<Option<IgnoredItem>>;

    /// Mark a key as ignored; adding an already-ignored key is a no-op
    async fn add_ignored_item(&self, key: &str) -> StoreResult<()>;

    /// Remove a key from the ignored set; a no-op when the key is absent
    async fn remove_ignored_item(&self, key: &str) -> StoreResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_display() {
        let err = StoreError::Configuration("DATABASE_URL is malformed".to_string());
        assert_eq!(
            err.to_string(),
            "Configuration error: DATABASE_URL is malformed"
        );

        let err = StoreError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "file not found",
        ));
        assert!(err.to_string().contains("IO error"));
    }

    #[test]
    fn test_ignored_item_roundtrip() {
        let item = IgnoredItem::new("plex://episode/abc123");
        let json = serde_json::to_string(&item).unwrap();
        let back: IgnoredItem = serde_json::from_str(&json).unwrap();
        assert_eq!(item, back);
    }
}
