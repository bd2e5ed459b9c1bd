//! PostgreSQL schema definitions
//!
//! Mirrors the SQLite library schema. Integer columns are BIGINT so they
//! decode into the same `i64` entity fields on both backends; timestamps
//! stay TEXT for the same reason.

use sqlx::PgPool;

use super::error::PostgresError;

/// Complete schema SQL for PostgreSQL
pub const SCHEMA: &str = r#"
-- =============================================================================
-- 1. Authors
-- =============================================================================
CREATE TABLE IF NOT EXISTS authors (
    id BIGSERIAL PRIMARY KEY,
    name TEXT NOT NULL UNIQUE,
    sort TEXT,
    link TEXT NOT NULL DEFAULT ''
);

-- =============================================================================
-- 2. Books
-- =============================================================================
CREATE TABLE IF NOT EXISTS books (
    id BIGSERIAL PRIMARY KEY,
    title TEXT NOT NULL DEFAULT 'Unknown',
    sort TEXT,
    timestamp TEXT DEFAULT to_char(NOW() AT TIME ZONE 'UTC', 'YYYY-MM-DD HH24:MI:SS'),
    pubdate TEXT DEFAULT to_char(NOW() AT TIME ZONE 'UTC', 'YYYY-MM-DD HH24:MI:SS'),
    series_index DOUBLE PRECISION NOT NULL DEFAULT 1.0,
    author_sort TEXT,
    isbn TEXT DEFAULT '',
    lccn TEXT DEFAULT '',
    path TEXT NOT NULL DEFAULT '',
    flags BIGINT NOT NULL DEFAULT 1,
    uuid TEXT,
    has_cover BOOLEAN DEFAULT FALSE,
    last_modified TEXT NOT NULL DEFAULT '2000-01-01 00:00:00+00:00'
);

CREATE INDEX IF NOT EXISTS books_idx ON books (sort);
CREATE INDEX IF NOT EXISTS authors_idx ON books (author_sort);

-- =============================================================================
-- 3. Classification
-- =============================================================================
CREATE TABLE IF NOT EXISTS tags (
    id BIGSERIAL PRIMARY KEY,
    name TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS ratings (
    id BIGSERIAL PRIMARY KEY,
    rating BIGINT UNIQUE CHECK(rating > -1 AND rating < 11)
);

CREATE TABLE IF NOT EXISTS series (
    id BIGSERIAL PRIMARY KEY,
    name TEXT NOT NULL UNIQUE,
    sort TEXT
);

CREATE TABLE IF NOT EXISTS languages (
    id BIGSERIAL PRIMARY KEY,
    lang_code TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS publishers (
    id BIGSERIAL PRIMARY KEY,
    name TEXT NOT NULL UNIQUE,
    sort TEXT
);

-- =============================================================================
-- 4. Per-book records
-- =============================================================================
CREATE TABLE IF NOT EXISTS comments (
    id BIGSERIAL PRIMARY KEY,
    book BIGINT NOT NULL UNIQUE,
    text TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS data (
    id BIGSERIAL PRIMARY KEY,
    book BIGINT NOT NULL,
    format TEXT NOT NULL,
    uncompressed_size BIGINT NOT NULL,
    name TEXT NOT NULL,
    UNIQUE(book, format)
);

CREATE TABLE IF NOT EXISTS identifiers (
    id BIGSERIAL PRIMARY KEY,
    book BIGINT NOT NULL,
    type TEXT NOT NULL DEFAULT 'isbn',
    val TEXT NOT NULL,
    UNIQUE(book, type)
);

CREATE INDEX IF NOT EXISTS data_idx ON data (book);
"#;

/// Apply the schema in one round trip using the simple query protocol
pub async fn apply(pool: &PgPool) -> Result<(), PostgresError> {
    sqlx::raw_sql(SCHEMA)
        .execute(pool)
        .await
        .map_err(|e| PostgresError::Schema(e.to_string()))?;
    tracing::debug!("PostgreSQL schema applied");
    Ok(())
}
