//! Application configuration management.
//!
//! Configuration is merged from default values, an optional configuration
//! file and environment variables, in increasing order of precedence.

use crate::{Cli, schedule::Scheduler, source::SourceConfig};
use serde::{Deserialize, Serialize};

/// The main application configuration that composes all component configs
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct AppConfig {
    /// Web server configuration (bind address, pagination limit)
    #[serde(default)]
    pub server: sts_axum::config::AxumConfig,

    /// Tree cache configuration
    #[serde(default)]
    pub database: sts_sqlite::config::SqliteConfig,

    /// Feed refresh scheduling configuration
    #[serde(default)]
    pub schedule: Scheduler,

    /// Where the product feed is read from
    #[serde(default)]
    pub products: SourceConfig,
}

impl AppConfig {
    /// Load configuration from multiple sources with precedence:
    /// 1. Command-line overrides (highest priority)
    /// 2. Environment variables
    /// 3. Config file given by the CLI
    /// 4. Default values (lowest priority)
    ///
    /// Environment variables are mapped using the pattern:
    /// `APP_<SECTION>__<KEY>` maps to `<section>.<key>`
    ///
    /// # Examples
    ///
    /// ```bash
    /// # Keep the cache on disk
    /// export APP_DATABASE__DATABASE_PATH="/data/metric-cache.db"
    ///
    /// # Set server bind address
    /// export APP_SERVER__BIND_ADDRESS="0.0.0.0:3000"
    ///
    /// # Refresh the feed daily, just after the cached trees go stale
    /// export APP_SCHEDULE__FROM="2024-01-01T00:05:00Z"
    /// export APP_SCHEDULE__EVERY="1d"
    /// ```
    pub fn load(cli: &Cli) -> anyhow::Result<Self> {
        let mut config = config::Config::builder();

        // Start with default values
        config = config.add_source(config::Config::try_from(&Self::default())?);

        // Layer on config file if it is specified and exists
        if let Some(path) = &cli.config {
            if path.exists() {
                config = config.add_source(config::File::from(path.as_path()))
            } else {
                return Err(anyhow::anyhow!(
                    "Config file {} does not exist",
                    path.display()
                ));
            }
        }

        // This maps APP_SERVER__BIND_ADDRESS to server.bind_address
        config = config.add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let mut loaded: Self = config.build()?.try_deserialize()?;
        if let Some(path) = &cli.products {
            loaded.products.path = path.clone();
        }
        Ok(loaded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{path::PathBuf, time::Duration};
    use time::macros::datetime;

    fn config_file(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("stsdemo-{}-{name}.toml", std::process::id()));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_file_layer() {
        let path = config_file(
            "layer",
            r#"
            [server]
            page_limit = 25

            [products]
            path = "feed.json"

            [schedule]
            from = "2024-01-01T00:05:00Z"
            every = "1d"
            "#,
        );
        let cli = Cli {
            config: Some(path.clone()),
            products: None,
        };
        let config = AppConfig::load(&cli).unwrap();
        std::fs::remove_file(path).unwrap();

        assert_eq!(config.server.page_limit, 25);
        assert_eq!(config.products.path, PathBuf::from("feed.json"));
        assert_eq!(config.schedule.every, Some(Duration::from_secs(86_400)));
        assert_eq!(config.schedule.from, Some(datetime!(2024-01-01 0:05 UTC)));
        assert!(config.database.database_path.is_none());
    }

    #[test]
    fn test_cli_overrides_products() {
        let path = config_file("override", "[products]\npath = \"feed.json\"\n");
        let cli = Cli {
            config: Some(path.clone()),
            products: Some(PathBuf::from("other.json")),
        };
        let config = AppConfig::load(&cli).unwrap();
        std::fs::remove_file(path).unwrap();

        assert_eq!(config.products.path, PathBuf::from("other.json"));
    }

    #[test]
    fn test_missing_file() {
        let cli = Cli {
            config: Some(PathBuf::from("/definitely/not/here.toml")),
            products: None,
        };
        assert!(AppConfig::load(&cli).is_err());
    }
}
