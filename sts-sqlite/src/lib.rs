#![warn(missing_docs)]
#![doc = include_str!("../README.md")]

use sqlx::sqlite;
use std::{str::FromStr, time::Duration};
use tokio::try_join;
use tracing::{Level, event};

pub mod config;
mod r#impl;
pub mod types;

use config::SqliteConfig;

/// SQLite storage for cached metric trees.
///
/// Reads go through a pool of connections while writes are funnelled
/// through a single connection, which is how SQLite prefers to be driven in
/// WAL mode.
#[derive(Clone)]
pub struct Db {
    /// Connection pool for read operations
    pub reader: sqlx::Pool<sqlx::Sqlite>,
    /// Connection pool for write operations (limited to 1 connection)
    pub writer: sqlx::Pool<sqlx::Sqlite>,
}

impl Db {
    /// Open (and if allowed, create) the database and apply pending
    /// migrations.
    ///
    /// Without a `database_path` the cache lives in memory and is shared by
    /// both pools.
    ///
    /// # Errors
    ///
    /// Returns `sqlx::Error` if the connection cannot be established or a
    /// migration fails.
    pub async fn open(config: &SqliteConfig) -> Result<Self, sqlx::Error> {
        let db_path = config
            .database_path
            .as_ref()
            .map(|p| p.to_string_lossy().into_owned());

        let options =
            sqlite::SqliteConnectOptions::from_str(db_path.as_deref().unwrap_or(":memory:"))?
                .busy_timeout(Duration::from_secs(5))
                .journal_mode(sqlite::SqliteJournalMode::Wal)
                .synchronous(sqlite::SqliteSynchronous::Normal)
                .pragma("temp_store", "memory")
                .create_if_missing(config.create_if_missing);

        let reader = sqlite::SqlitePoolOptions::new().connect_with(options.clone());
        let writer = sqlite::SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options);

        let (reader, writer) = try_join!(reader, writer)?;

        sqlx::migrate!("./schema").run(&writer).await?;
        event!(
            Level::INFO,
            path = db_path.as_deref().unwrap_or(":memory:"),
            "opened metric cache"
        );

        Ok(Self { reader, writer })
    }
}
