//! sweepstore - Persistence layer for a media-library cleanup tool
//!
//! Tracks two pieces of state for the surrounding application:
//!
//! - **Deleted sizes** - cumulative bytes deleted per named library
//! - **Ignored items** - content keys to skip in future processing passes
//!
//! Both live behind a single [`store::Database`] facade backed by one of two
//! interchangeable engines, selected once from the environment at
//! construction:
//!
//! - **Document engine** - an embedded, file-backed JSON document store
//!   (a single `db.json` under `CONFIG_DIR`)
//! - **Relational engine** - a SQL database (local file, in-memory, or
//!   remote server) addressed by the `DATABASE_URL` connection string
//!
//! # Example
//!
//! ```no_run
//! use sweepstore::store::{Database, StoreResult};
//!
//! async fn example() -> StoreResult<()> {
//!     let db = Database::from_env().await?;
//!
//!     db.set_deleted_size("movies", 4_096).await?;
//!     assert_eq!(db.get_deleted_size("movies").await?, 4_096);
//!
//!     db.add_ignored_item("movie-1080p-remux").await?;
//!     db.remove_ignored_item("movie-1080p-remux").await?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]

/// Configuration and environment loading
pub mod config;

/// Storage facade and engines
pub mod store;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::StoreConfig;
    pub use crate::store::{
        Database, DocumentEngine, IgnoredItem, RelationalEngine, StorageEngine, StoreError,
        StoreResult,
    };
}
