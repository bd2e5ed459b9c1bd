//! PostgreSQL error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PostgresError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Schema setup failed: {0}")]
    Schema(String),

    #[error("Configuration error: {0}")]
    Config(String),
}
