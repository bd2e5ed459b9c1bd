//! Library metadata entities

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// ============================================================================
// People and titles
// ============================================================================

/// Author row from database
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Author {
    pub id: i64,
    pub name: String,
    /// Sort key, e.g. "Asimov, Isaac"
    pub sort: Option<String>,
    pub link: String,
}

/// Book row from database
///
/// Timestamps are stored as ISO-8601 text and passed through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub sort: Option<String>,
    pub timestamp: Option<String>,
    pub pubdate: Option<String>,
    pub series_index: f64,
    pub author_sort: Option<String>,
    pub isbn: Option<String>,
    pub lccn: Option<String>,
    pub path: String,
    pub flags: i64,
    pub uuid: Option<String>,
    pub has_cover: Option<bool>,
    pub last_modified: String,
}

// ============================================================================
// Classification
// ============================================================================

/// Tag row from database
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Tag {
    pub id: i64,
    pub name: String,
}

/// Rating row from database (0-10, half stars)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Rating {
    pub id: i64,
    pub rating: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Series {
    pub id: i64,
    pub name: String,
    pub sort: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Language {
    pub id: i64,
    pub lang_code: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Publisher {
    pub id: i64,
    pub name: String,
    pub sort: Option<String>,
}

// ============================================================================
// Per-book records
// ============================================================================

/// Book description, one per book
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Comment {
    pub id: i64,
    pub book: i64,
    pub text: String,
}

/// A stored file format of a book
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct BookData {
    pub id: i64,
    pub book: i64,
    pub format: String,
    pub uncompressed_size: i64,
    /// File name without extension
    pub name: String,
}

/// External identifier of a book (isbn, goodreads, amazon, ...)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Identifier {
    pub id: i64,
    pub book: i64,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub kind: String,
    pub val: String,
}
