//! Document Storage Engine
//!
//! Embedded single-file JSON store with a table/document-id layout: each
//! top-level table maps document-ids to documents. All libraries' deleted-size
//! counters share one document at a fixed, well-known document-id; ignored
//! items get one document per key in a separate table.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use super::traits::{IgnoredItem, StorageEngine, StoreResult};

/// Document-id of the shared deleted-size document, kept from the legacy
/// single-document convention.
pub const DELETED_SIZE_DOC_ID: u64 = 1;

/// File name of the backing store under the configured directory.
pub const DB_FILE_NAME: &str = "db.json";

/// On-disk shape of the backing file.
#[derive(Debug, Default, Serialize, Deserialize)]
struct DocumentFile {
    /// Deleted-size table: doc-id -> {library_name: bytes}. Only
    /// [`DELETED_SIZE_DOC_ID`] is ever populated.
    #[serde(default)]
    deleted_size: BTreeMap<u64, BTreeMap<String, u64>>,
    /// Ignored-items table: doc-id -> record.
    #[serde(default)]
    ignored_items: BTreeMap<u64, IgnoredItem>,
}

/// Embedded document storage engine
///
/// Every operation re-reads the backing file, and mutations rewrite it
/// atomically (temp file + rename). Concurrent writers interleave whole
/// read-modify-write cycles; the last rewrite wins.
pub struct DocumentEngine {
    path: PathBuf,
}

impl DocumentEngine {
    /// Open (or create) the store under `config_dir`.
    ///
    /// The backing file itself is created lazily on first write; a missing
    /// file reads as an empty store.
    pub fn open<P: AsRef<Path>>(config_dir: P) -> StoreResult<Self> {
        let dir = config_dir.as_ref();
        if !dir.as_os_str().is_empty() {
            std::fs::create_dir_all(dir)?;
        }
        Ok(Self {
            path: dir.join(DB_FILE_NAME),
        })
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> StoreResult<DocumentFile> {
        match fs::read(&self.path).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(DocumentFile::default()),
            Err(e) => Err(e.into()),
        }
    }

    /// Rewrite the backing file using the temp file + rename pattern.
    async fn persist(&self, file: &DocumentFile) -> StoreResult<()> {
        let json = serde_json::to_vec_pretty(file)?;
        let temp_path = self.path.with_extension("tmp");

        let mut f = fs::File::create(&temp_path).await?;
        f.write_all(&json).await?;
        f.sync_all().await?;

        fs::rename(&temp_path, &self.path).await?;

        Ok(())
    }
}

#[async_trait]
impl StorageEngine for DocumentEngine {
    fn engine_type(&self) -> &'static str {
        "document"
    }

    async fn set_deleted_size(&self, library_name: &str, deleted_size: u64) -> StoreResult<()> {
        let mut file = self.load().await?;
        // Merge into the shared document: other libraries' fields survive.
        file.deleted_size
            .entry(DELETED_SIZE_DOC_ID)
            .or_default()
            .insert(library_name.to_string(), deleted_size);
        self.persist(&file).await?;
        debug!(library = library_name, bytes = deleted_size, "Deleted size recorded");
        Ok(())
    }

    async fn get_deleted_size(&self, library_name: &str) -> StoreResult<u64> {
        let file = self.load().await?;
        Ok(file
            .deleted_size
            .get(&DELETED_SIZE_DOC_ID)
            .and_then(|doc| doc.get(library_name))
            .copied()
            .unwrap_or(0))
    }

    async fn get_ignored_item(&self, key: &str) -> StoreResult<Option<IgnoredItem>> {
        let file = self.load().await?;
        Ok(file
            .ignored_items
            .values()
            .find(|item| item.key == key)
            .cloned())
    }

    async fn add_ignored_item(&self, key: &str) -> StoreResult<()> {
        let mut file = self.load().await?;
        if file.ignored_items.values().any(|item| item.key == key) {
            return Ok(());
        }
        let doc_id = file.ignored_items.keys().next_back().map_or(1, |id| id + 1);
        file.ignored_items.insert(doc_id, IgnoredItem::new(key));
        self.persist(&file).await?;
        debug!(key, "Ignored item added");
        Ok(())
    }

    async fn remove_ignored_item(&self, key: &str) -> StoreResult<()> {
        let mut file = self.load().await?;
        let before = file.ignored_items.len();
        file.ignored_items.retain(|_, item| item.key != key);
        if file.ignored_items.len() != before {
            self.persist(&file).await?;
            debug!(key, "Ignored item removed");
        }
        Ok(())
    }
}
