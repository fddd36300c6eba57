//! Configuration of the SQLite cache.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Where the cache lives and whether it may be created.
///
/// # Example
///
/// ```
/// # use sts_sqlite::config::SqliteConfig;
/// # use std::path::PathBuf;
/// // In-memory cache (default), lost on restart
/// let config = SqliteConfig::default();
///
/// // Cache that survives restarts
/// let config = SqliteConfig {
///     database_path: Some(PathBuf::from("metric-cache.db")),
///     create_if_missing: true,
/// };
/// ```
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SqliteConfig {
    /// Database file path. If None, the cache is kept in memory
    pub database_path: Option<PathBuf>,

    /// Whether to create the database if it doesn't exist
    #[serde(default = "default_true")]
    pub create_if_missing: bool,
}

fn default_true() -> bool {
    true
}

impl Default for SqliteConfig {
    fn default() -> Self {
        Self {
            database_path: None,
            create_if_missing: true,
        }
    }
}
