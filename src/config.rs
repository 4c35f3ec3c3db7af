//! Store configuration.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::{CatalogError, Result};

/// Path of an in-memory database.
pub const IN_MEMORY: &str = ":memory:";

/// Catalog store configuration
///
/// ```toml
/// db_path = "/data/shopping.db"
/// busy_timeout_ms = 2000
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CatalogConfig {
    /// Path to the SQLite database file, or `:memory:`
    pub db_path: String,
    /// How long a locked database is retried before failing.
    pub busy_timeout_ms: Option<u64>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self::new(IN_MEMORY)
    }
}

impl CatalogConfig {
    pub fn new(db_path: impl Into<String>) -> Self {
        Self {
            db_path: db_path.into(),
            busy_timeout_ms: None,
        }
    }

    pub fn with_busy_timeout(mut self, ms: u64) -> Self {
        self.busy_timeout_ms = Some(ms);
        self
    }

    pub fn busy_timeout(&self) -> Option<Duration> {
        self.busy_timeout_ms.map(Duration::from_millis)
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| CatalogError::Config(e.to_string()))
    }

    /// Reads a TOML config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| CatalogError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_memory() {
        let config = CatalogConfig::from_toml_str("").unwrap();
        assert_eq!(config, CatalogConfig::new(IN_MEMORY));
        assert_eq!(config.busy_timeout(), None);
    }

    #[test]
    fn parses_all_fields() {
        let config =
            CatalogConfig::from_toml_str("db_path = \"shop.db\"\nbusy_timeout_ms = 250\n").unwrap();
        assert_eq!(config, CatalogConfig::new("shop.db").with_busy_timeout(250));
        assert_eq!(config.busy_timeout(), Some(Duration::from_millis(250)));
    }

    #[test]
    fn rejects_unknown_keys() {
        let err = CatalogConfig::from_toml_str("path = \"x\"").unwrap_err();
        assert!(matches!(err, CatalogError::Config(_)));
    }

    #[test]
    fn load_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = CatalogConfig::load(dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, CatalogError::Config(msg) if msg.contains("absent.toml")));
    }
}
