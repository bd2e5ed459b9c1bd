//! SQLite schema definitions
//!
//! Library metadata tables. Every statement is idempotent so the schema can
//! be applied on each start against an existing library file.

use sqlx::SqlitePool;

use super::error::SqliteError;

/// Complete schema SQL
pub const SCHEMA: &str = r#"
-- =============================================================================
-- 1. Authors
-- =============================================================================
CREATE TABLE IF NOT EXISTS authors (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL COLLATE NOCASE,
    sort TEXT COLLATE NOCASE,
    link TEXT NOT NULL DEFAULT '',
    UNIQUE(name)
);

-- =============================================================================
-- 2. Books
-- =============================================================================
CREATE TABLE IF NOT EXISTS books (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL DEFAULT 'Unknown' COLLATE NOCASE,
    sort TEXT COLLATE NOCASE,
    timestamp TEXT DEFAULT CURRENT_TIMESTAMP,
    pubdate TEXT DEFAULT CURRENT_TIMESTAMP,
    series_index REAL NOT NULL DEFAULT 1.0,
    author_sort TEXT COLLATE NOCASE,
    isbn TEXT DEFAULT '' COLLATE NOCASE,
    lccn TEXT DEFAULT '' COLLATE NOCASE,
    path TEXT NOT NULL DEFAULT '',
    flags INTEGER NOT NULL DEFAULT 1,
    uuid TEXT,
    has_cover BOOL DEFAULT 0,
    last_modified TEXT NOT NULL DEFAULT '2000-01-01 00:00:00+00:00'
);

CREATE INDEX IF NOT EXISTS books_idx ON books (sort COLLATE NOCASE);
CREATE INDEX IF NOT EXISTS authors_idx ON books (author_sort COLLATE NOCASE);

-- =============================================================================
-- 3. Classification
-- =============================================================================
CREATE TABLE IF NOT EXISTS tags (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL COLLATE NOCASE,
    UNIQUE (name)
);

CREATE TABLE IF NOT EXISTS ratings (
    id INTEGER PRIMARY KEY,
    rating INTEGER CHECK(rating > -1 AND rating < 11),
    UNIQUE (rating)
);

CREATE TABLE IF NOT EXISTS series (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL COLLATE NOCASE,
    sort TEXT COLLATE NOCASE,
    UNIQUE (name)
);

CREATE TABLE IF NOT EXISTS languages (
    id INTEGER PRIMARY KEY,
    lang_code TEXT NOT NULL COLLATE NOCASE,
    UNIQUE(lang_code)
);

CREATE TABLE IF NOT EXISTS publishers (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL COLLATE NOCASE,
    sort TEXT COLLATE NOCASE,
    UNIQUE(name)
);

-- =============================================================================
-- 4. Per-book records
-- =============================================================================
CREATE TABLE IF NOT EXISTS comments (
    id INTEGER PRIMARY KEY,
    book INTEGER NOT NULL,
    text TEXT NOT NULL COLLATE NOCASE,
    UNIQUE(book)
);

CREATE TABLE IF NOT EXISTS data (
    id INTEGER PRIMARY KEY,
    book INTEGER NOT NULL,
    format TEXT NOT NULL COLLATE NOCASE,
    uncompressed_size INTEGER NOT NULL,
    name TEXT NOT NULL,
    UNIQUE(book, format)
);

CREATE TABLE IF NOT EXISTS identifiers (
    id INTEGER PRIMARY KEY,
    book INTEGER NOT NULL,
    type TEXT NOT NULL DEFAULT 'isbn' COLLATE NOCASE,
    val TEXT NOT NULL COLLATE NOCASE,
    UNIQUE(book, type)
);

CREATE INDEX IF NOT EXISTS data_idx ON data (book);
CREATE INDEX IF NOT EXISTS comments_idx ON comments (book);
"#;

/// Apply the schema; safe to run against an already initialized database
pub async fn apply(pool: &SqlitePool) -> Result<(), SqliteError> {
    let start = std::time::Instant::now();
    sqlx::raw_sql(SCHEMA)
        .execute(pool)
        .await
        .map_err(|e| SqliteError::Schema(e.to_string()))?;
    tracing::debug!(
        elapsed_ms = start.elapsed().as_millis() as u64,
        "SQLite schema applied"
    );
    Ok(())
}
