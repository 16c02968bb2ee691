//! Environment variable loading and management.
//!
//! This module handles ONLY host-level storage configuration. Anything the
//! surrounding application needs (scan schedules, API credentials, and so on)
//! is out of scope here.

use std::env;
use std::path::{Path, PathBuf};

/// Directory for local storage files (set by the container image in
/// production deployments).
pub const CONFIG_DIR_VAR: &str = "CONFIG_DIR";

/// Relational connection string. When present, the relational engine is
/// selected instead of the document engine.
pub const DATABASE_URL_VAR: &str = "DATABASE_URL";

/// Auth token for remote relational servers.
pub const DATABASE_AUTH_TOKEN_VAR: &str = "DATABASE_AUTH_TOKEN";

/// Resolved storage configuration.
///
/// Read once, before engine construction. The engine choice it encodes is
/// fixed for the process lifetime.
#[derive(Debug, Clone, Default)]
pub struct StoreConfig {
    /// Directory holding the document engine's backing file.
    pub config_dir: PathBuf,
    /// Relational connection string; its presence selects the relational
    /// engine.
    pub database_url: Option<String>,
    /// Auth token passed along when `database_url` points at a remote server.
    pub auth_token: Option<String>,
}

impl StoreConfig {
    /// Read configuration from the process environment.
    ///
    /// An unset or empty `CONFIG_DIR` resolves to the current directory; an
    /// unset or empty `DATABASE_URL` selects the document engine.
    pub fn from_env() -> Self {
        Self {
            config_dir: PathBuf::from(env::var(CONFIG_DIR_VAR).unwrap_or_default()),
            database_url: env::var(DATABASE_URL_VAR).ok().filter(|s| !s.is_empty()),
            auth_token: env::var(DATABASE_AUTH_TOKEN_VAR).ok().filter(|s| !s.is_empty()),
        }
    }

    /// Load a `.env` file, then read configuration from the environment.
    ///
    /// Only loads the file when an explicit path is provided and exists. This
    /// avoids picking up repository or system `.env` files during unit tests
    /// which expect default values.
    pub fn from_env_file(env_file: Option<&Path>) -> Self {
        if let Some(path) = env_file {
            if path.exists() {
                if let Err(e) = dotenv::from_path(path) {
                    tracing::warn!("Failed to load .env file: {e}");
                }
            }
        }
        Self::from_env()
    }

    /// Configuration selecting the document engine rooted at `config_dir`.
    pub fn document<P: Into<PathBuf>>(config_dir: P) -> Self {
        Self {
            config_dir: config_dir.into(),
            ..Self::default()
        }
    }

    /// Configuration selecting the relational engine at `url`.
    pub fn relational<S: Into<String>>(url: S) -> Self {
        Self {
            database_url: Some(url.into()),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_selection() {
        env::remove_var(DATABASE_URL_VAR);
        env::remove_var(CONFIG_DIR_VAR);
        let config = StoreConfig::from_env();
        assert_eq!(config.config_dir, PathBuf::new());
        assert_eq!(config.database_url, None);

        env::set_var(CONFIG_DIR_VAR, "/data/config");
        env::set_var(DATABASE_URL_VAR, "sqlite:///data/config/db.sqlite");
        let config = StoreConfig::from_env();
        assert_eq!(config.config_dir, PathBuf::from("/data/config"));
        assert_eq!(
            config.database_url.as_deref(),
            Some("sqlite:///data/config/db.sqlite")
        );

        // An empty connection string selects the document engine.
        env::set_var(DATABASE_URL_VAR, "");
        let config = StoreConfig::from_env();
        assert_eq!(config.database_url, None);

        env::remove_var(DATABASE_URL_VAR);
        env::remove_var(CONFIG_DIR_VAR);
    }

    #[test]
    fn test_explicit_constructors() {
        let config = StoreConfig::document("/tmp/store");
        assert_eq!(config.config_dir, PathBuf::from("/tmp/store"));
        assert!(config.database_url.is_none());

        let config = StoreConfig::relational(":memory:");
        assert_eq!(config.database_url.as_deref(), Some(":memory:"));
    }
}
