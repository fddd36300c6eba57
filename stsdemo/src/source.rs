//! Reading the product feed from a JSON file.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use sts_core::{models::RawProductRecord, ports::ProductSource};
use thiserror::Error;
use tracing::{Level, event};

/// Where the product feed lives.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Path to a JSON file holding an array of product rows
    #[serde(default = "default_path")]
    pub path: PathBuf,
}

fn default_path() -> PathBuf {
    PathBuf::from("products.json")
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            path: default_path(),
        }
    }
}

/// The feed could not be read as a whole.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The file could not be read
    #[error("failed to read {path}: {source}")]
    Io {
        /// The configured path
        path: PathBuf,
        /// The underlying error
        source: std::io::Error,
    },
    /// The file is not a JSON array
    #[error("product feed is not a JSON array: {0}")]
    Json(#[from] serde_json::Error),
}

/// A [`ProductSource`] backed by a JSON file, re-read on every fetch.
///
/// Array entries that are not product-shaped (a string, a number where a
/// series is expected, ...) are dropped individually; only an unreadable
/// file or a payload that is not an array fails the fetch.
#[derive(Clone, Debug)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl From<SourceConfig> for JsonFileSource {
    fn from(config: SourceConfig) -> Self {
        Self { path: config.path }
    }
}

impl JsonFileSource {
    /// Decode a feed payload.
    pub fn decode(bytes: &[u8]) -> Result<Vec<RawProductRecord>, SourceError> {
        let values: Vec<serde_json::Value> = serde_json::from_slice(bytes)?;
        let total = values.len();
        let rows: Vec<RawProductRecord> = values
            .into_iter()
            .enumerate()
            .filter_map(|(index, value)| match serde_json::from_value(value) {
                Ok(row) => Some(row),
                Err(error) => {
                    event!(Level::WARN, index, %error, "skipping undecodable product row");
                    None
                }
            })
            .collect();
        if rows.len() < total {
            event!(
                Level::WARN,
                skipped = total - rows.len(),
                total,
                "product feed contained undecodable rows"
            );
        }
        Ok(rows)
    }
}

impl ProductSource for JsonFileSource {
    type Error = SourceError;

    async fn fetch(&self) -> Result<Vec<RawProductRecord>, Self::Error> {
        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|source| SourceError::Io {
                path: self.path.clone(),
                source,
            })?;
        Self::decode(&bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_skips_bad_rows() {
        let rows = JsonFileSource::decode(
            br#"[
                {"supplier": "acme", "brand": "zen", "type": "shoes", "article": "A-1",
                 "lastUpdate": "2024-05-31T00:00:00Z", "orders": [1, null, 2]},
                "not a product",
                {"supplier": "acme", "orders": "many"},
                {"brand": "solo"}
            ]"#,
        )
        .unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].orders, vec![Some(1.0), None, Some(2.0)]);
        assert_eq!(rows[1].brand.as_deref(), Some("solo"));
        assert_eq!(rows[1].supplier, None);
    }

    #[test]
    fn test_decode_rejects_non_array() {
        assert!(matches!(
            JsonFileSource::decode(br#"{"supplier": "acme"}"#),
            Err(SourceError::Json(_))
        ));
    }

    #[tokio::test]
    async fn test_missing_file() {
        let source = JsonFileSource::from(SourceConfig {
            path: PathBuf::from("/definitely/not/here.json"),
        });
        assert!(matches!(source.fetch().await, Err(SourceError::Io { .. })));
    }

    #[tokio::test]
    async fn test_fetch_file() {
        let path = std::env::temp_dir().join(format!("stsdemo-{}-feed.json", std::process::id()));
        std::fs::write(&path, br#"[{"supplier": "acme"}]"#).unwrap();
        let source = JsonFileSource::from(SourceConfig { path: path.clone() });
        let rows = source.fetch().await.unwrap();
        std::fs::remove_file(path).unwrap();
        assert_eq!(rows.len(), 1);
    }
}
