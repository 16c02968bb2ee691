//! Storage Facade and Engines
//!
//! This module provides a trait-based abstraction over two interchangeable
//! persistence engines. The facade picks one at construction, from
//! configuration, and holds it for its lifetime.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────┐
//! │      Database       │
//! │  (high-level API)   │
//! └──────────┬──────────┘
//!            │
//! ┌──────────▼──────────┐
//! │    StorageEngine    │  <-- Trait
//! │      (async)        │
//! └──────────┬──────────┘
//!            │
//!     ┌──────┴──────┐
//!     │             │
//! ┌───▼────┐   ┌────▼─────┐
//! │Document│   │Relational│
//! │ Engine │   │  Engine  │
//! └────────┘   └──────────┘
//! ```
//!
//! ## Usage
//!
//! ```no_run
//! use sweepstore::store::{self, StoreResult};
//!
//! async fn example() -> StoreResult<()> {
//!     let db = store::connect_from_env().await?;
//!
//!     db.set_deleted_size("movies", 1_500_000_000).await?;
//!     let freed = db.get_deleted_size("movies").await?;
//!
//!     db.add_ignored_item("plex://episode/abc123").await?;
//!     Ok(())
//! }
//! ```

pub mod database;
pub mod document_engine;
pub mod relational_engine;
pub mod traits;

pub use database::Database;
pub use document_engine::{DocumentEngine, DB_FILE_NAME, DELETED_SIZE_DOC_ID};
pub use relational_engine::RelationalEngine;
pub use traits::{IgnoredItem, StorageEngine, StoreError, StoreResult};

/// Connect a [`Database`] using the process environment.
pub async fn connect_from_env() -> StoreResult<Database> {
    Database::from_env().await
}
