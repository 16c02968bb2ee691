//! Configuration management
//!
//! Storage configuration is read once from the process environment before an
//! engine is constructed; the resulting [`StoreConfig`] fixes the engine
//! choice for the facade's lifetime.

mod environment;

pub use environment::{StoreConfig, CONFIG_DIR_VAR, DATABASE_AUTH_TOKEN_VAR, DATABASE_URL_VAR};
