//! Data storage layer
//!
//! - `sqlite` / `postgres` - Backend services owning the connection pools
//! - `sql` - Dialect differences between the two backends
//! - `search` - Whitelisted lookups, pagination and the query dispatcher
//! - `types` - Entity rows shared by both backends
//! - `error` - Unified error type for all backends

pub mod error;
pub mod postgres;
pub mod search;
pub mod sql;
pub mod sqlite;
pub mod types;

pub use error::DataError;
pub use postgres::PostgresService;
pub use sqlite::SqliteService;

use std::sync::Arc;

use crate::core::config::{DatabaseBackend, DatabaseConfig};
use sql::Backend;

/// Database service enum
///
/// Wraps the backend-specific service (SQLite or PostgreSQL). Services are
/// stored as Arc so handlers can hold them independently of the enum.
pub enum DatabaseService {
    /// SQLite backend (default, embedded)
    Sqlite(Arc<SqliteService>),
    /// PostgreSQL backend
    Postgres(Arc<PostgresService>),
}

impl DatabaseService {
    /// Initialize the configured backend
    pub async fn init(config: &DatabaseConfig) -> Result<Self, DataError> {
        match config.backend {
            DatabaseBackend::Sqlite => {
                let service = SqliteService::init(&config.sqlite).await?;
                Ok(Self::Sqlite(Arc::new(service)))
            }
            DatabaseBackend::Postgres => {
                let pg = config.postgres.as_ref().ok_or_else(|| {
                    DataError::Config("PostgreSQL configuration required".to_string())
                })?;
                let service = PostgresService::init(pg).await?;
                Ok(Self::Postgres(Arc::new(service)))
            }
        }
    }

    pub fn backend(&self) -> Backend {
        match self {
            Self::Sqlite(_) => Backend::Sqlite,
            Self::Postgres(_) => Backend::Postgres,
        }
    }

    /// Check that a connection can be acquired and used
    pub async fn ping(&self) -> Result<(), DataError> {
        match self {
            Self::Sqlite(s) => sqlx::query("SELECT 1")
                .execute(s.pool())
                .await
                .map(|_| ())
                .map_err(DataError::from_sqlite),
            Self::Postgres(p) => sqlx::query("SELECT 1")
                .execute(p.pool())
                .await
                .map(|_| ())
                .map_err(DataError::from_postgres),
        }
    }

    /// Close the database connection gracefully
    pub async fn close(&self) {
        match self {
            Self::Sqlite(s) => s.close().await,
            Self::Postgres(p) => p.close().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::SqliteConfig;

    #[tokio::test]
    async fn test_init_sqlite_backend() {
        let dir = tempfile::tempdir().unwrap();
        let config = DatabaseConfig {
            backend: DatabaseBackend::Sqlite,
            sqlite: SqliteConfig {
                path: dir.path().join("metadata.db"),
            },
            postgres: None,
        };

        let database = DatabaseService::init(&config).await.unwrap();
        assert_eq!(database.backend(), Backend::Sqlite);
        database.ping().await.unwrap();

        database.close().await;
        assert!(database.ping().await.is_err());
    }

    #[tokio::test]
    async fn test_init_postgres_without_config_fails() {
        let config = DatabaseConfig {
            backend: DatabaseBackend::Postgres,
            sqlite: SqliteConfig {
                path: "metadata.db".into(),
            },
            postgres: None,
        };
        assert!(matches!(
            DatabaseService::init(&config).await,
            Err(DataError::Config(_))
        ));
    }
}
