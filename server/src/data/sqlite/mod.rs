//! SQLite database service
//!
//! Opens a calibre-style `metadata.db` library file (creating it when
//! missing) and keeps a small read-mostly pool over it:
//! - WAL mode so searches never block on a concurrent writer
//! - Busy timeout instead of immediate `SQLITE_BUSY` failures
//! - In-memory temp storage for sorts
//!
//! The schema is applied on every start and is a no-op for an existing library.

pub mod error;
pub mod schema;

pub use error::SqliteError;
pub use sqlx::SqlitePool;

use std::time::Duration;

use sqlx::ConnectOptions;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use tracing::log::LevelFilter;

use crate::core::config::SqliteConfig;
use crate::core::constants::{
    SQLITE_BUSY_TIMEOUT_SECS, SQLITE_CACHE_SIZE, SQLITE_MAX_CONNECTIONS,
};

/// SQLite database service
///
/// Should be created once at server startup and shared across handlers.
pub struct SqliteService {
    pool: SqlitePool,
}

impl SqliteService {
    /// Open the library file and apply the schema
    pub async fn init(config: &SqliteConfig) -> Result<Self, SqliteError> {
        let db_path = &config.path;
        if let Some(parent) = db_path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await?;
        }

        let options = SqliteConnectOptions::new()
            .filename(db_path)
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(SQLITE_BUSY_TIMEOUT_SECS))
            .pragma("cache_size", SQLITE_CACHE_SIZE)
            .pragma("temp_store", "MEMORY")
            .log_statements(LevelFilter::Trace);

        let pool = SqlitePoolOptions::new()
            .max_connections(SQLITE_MAX_CONNECTIONS)
            .connect_with(options)
            .await?;

        schema::apply(&pool).await?;

        tracing::debug!(path = %db_path.display(), "SqliteService initialized");
        Ok(Self { pool })
    }

    /// Wrap an existing pool; the caller is responsible for the schema
    pub fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close the connection pool gracefully
    pub async fn close(&self) {
        self.pool.close().await;
        tracing::debug!("SQLite pool closed");
    }
}

/// Single-connection in-memory database with the schema applied
///
/// One connection, never recycled: every connection to `:memory:` is a
/// separate database.
#[cfg(test)]
pub async fn memory_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect(":memory:")
        .await
        .unwrap();
    schema::apply(&pool).await.unwrap();
    pool
}
