//! Searchable resources
//!
//! Every resource is a marker type carrying a static [`ResourceSpec`]: the
//! table it reads, the fields and operators a lookup may use, and the
//! columns a page may be sorted by. These tables are the only source of SQL
//! identifiers the dispatcher ever emits.

use serde::Serialize;
use sqlx::FromRow;
use sqlx::postgres::PgRow;
use sqlx::sqlite::SqliteRow;

use super::operator::Operator;
use crate::data::types::{
    Author, Book, BookData, Comment, Identifier, Language, Publisher, Rating, Series, Tag,
};

/// Storage type of a filterable column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Text,
    Integer,
}

/// A filterable column; `name` is both the API field name and the SQL identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub name: &'static str,
    pub kind: ColumnKind,
}

impl Column {
    pub const fn text(name: &'static str) -> Self {
        Self {
            name,
            kind: ColumnKind::Text,
        }
    }

    pub const fn integer(name: &'static str) -> Self {
        Self {
            name,
            kind: ColumnKind::Integer,
        }
    }
}

/// Static whitelist configuration for one resource
#[derive(Debug)]
pub struct ResourceSpec {
    /// URL path segment (`/api/v1/{name}`)
    pub name: &'static str,
    pub table: &'static str,
    /// SELECT list, in entity field order
    pub columns: &'static str,
    /// Filterable fields, in declared order
    pub fields: &'static [Column],
    pub operators: &'static [Operator],
    /// Example field for documentation; never used as a runtime fallback
    pub default_field: &'static str,
    /// Example operator for documentation; never used as a runtime fallback
    pub default_operator: Operator,
    /// Columns a page may be ordered by
    pub sortable: &'static [&'static str],
}

impl ResourceSpec {
    /// Resolve a caller-supplied field name to its whitelisted column
    pub fn field(&self, name: &str) -> Option<&'static Column> {
        let fields: &'static [Column] = self.fields;
        fields.iter().find(|c| c.name == name)
    }

    pub fn allows(&self, operator: Operator) -> bool {
        self.operators.contains(&operator)
    }

    /// Resolve a caller-supplied sort field to its static identifier
    pub fn sort_column(&self, name: &str) -> Option<&'static str> {
        let sortable: &'static [&'static str] = self.sortable;
        sortable.iter().copied().find(|c| *c == name)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &'static str> {
        let fields: &'static [Column] = self.fields;
        fields.iter().map(|c| c.name)
    }
}

/// A searchable resource: its whitelist plus the entity rows map into
pub trait Resource: Send + Sync + 'static {
    const SPEC: ResourceSpec;

    type Entity: for<'r> FromRow<'r, SqliteRow>
        + for<'r> FromRow<'r, PgRow>
        + Serialize
        + Send
        + Unpin
        + 'static;
}

#[derive(Debug, Clone, Copy)]
pub struct Authors;

impl Resource for Authors {
    const SPEC: ResourceSpec = ResourceSpec {
        name: "authors",
        table: "authors",
        columns: "id, name, sort, link",
        fields: &[Column::text("name")],
        operators: Operator::TEXT,
        default_field: "name",
        default_operator: Operator::Eq,
        sortable: &["id", "name", "sort"],
    };
    type Entity = Author;
}

#[derive(Debug, Clone, Copy)]
pub struct Books;

impl Resource for Books {
    const SPEC: ResourceSpec = ResourceSpec {
        name: "books",
        table: "books",
        columns: "id, title, sort, timestamp, pubdate, series_index, author_sort, isbn, lccn, \
                  path, flags, uuid, has_cover, last_modified",
        fields: &[
            Column::text("title"),
            Column::text("author_sort"),
            Column::text("isbn"),
        ],
        operators: Operator::TEXT,
        default_field: "title",
        default_operator: Operator::Like,
        sortable: &[
            "id",
            "title",
            "sort",
            "author_sort",
            "timestamp",
            "pubdate",
            "series_index",
            "last_modified",
        ],
    };
    type Entity = Book;
}

#[derive(Debug, Clone, Copy)]
pub struct Tags;

impl Resource for Tags {
    const SPEC: ResourceSpec = ResourceSpec {
        name: "tags",
        table: "tags",
        columns: "id, name",
        fields: &[Column::text("name")],
        operators: Operator::TEXT,
        default_field: "name",
        default_operator: Operator::Eq,
        sortable: &["id", "name"],
    };
    type Entity = Tag;
}

#[derive(Debug, Clone, Copy)]
pub struct Ratings;

impl Resource for Ratings {
    const SPEC: ResourceSpec = ResourceSpec {
        name: "ratings",
        table: "ratings",
        columns: "id, rating",
        fields: &[Column::integer("rating")],
        operators: Operator::NUMERIC,
        default_field: "rating",
        default_operator: Operator::Gte,
        sortable: &["id", "rating"],
    };
    type Entity = Rating;
}

#[derive(Debug, Clone, Copy)]
pub struct SeriesList;

impl Resource for SeriesList {
    const SPEC: ResourceSpec = ResourceSpec {
        name: "series",
        table: "series",
        columns: "id, name, sort",
        fields: &[Column::text("name")],
        operators: Operator::TEXT,
        default_field: "name",
        default_operator: Operator::Eq,
        sortable: &["id", "name", "sort"],
    };
    type Entity = Series;
}

#[derive(Debug, Clone, Copy)]
pub struct Comments;

impl Resource for Comments {
    const SPEC: ResourceSpec = ResourceSpec {
        name: "comments",
        table: "comments",
        columns: "id, book, text",
        fields: &[Column::text("text")],
        operators: Operator::TEXT,
        default_field: "text",
        default_operator: Operator::Like,
        sortable: &["id", "book"],
    };
    type Entity = Comment;
}

/// Book files (`data` table). Allows every operator, including pattern
/// matching on the byte size.
#[derive(Debug, Clone, Copy)]
pub struct Data;

impl Resource for Data {
    const SPEC: ResourceSpec = ResourceSpec {
        name: "data",
        table: "data",
        columns: "id, book, format, uncompressed_size, name",
        fields: &[
            Column::text("format"),
            Column::text("name"),
            Column::integer("uncompressed_size"),
        ],
        operators: Operator::ALL,
        default_field: "format",
        default_operator: Operator::Eq,
        sortable: &["id", "book", "format", "name", "uncompressed_size"],
    };
    type Entity = BookData;
}

#[derive(Debug, Clone, Copy)]
pub struct Languages;

impl Resource for Languages {
    const SPEC: ResourceSpec = ResourceSpec {
        name: "languages",
        table: "languages",
        columns: "id, lang_code",
        fields: &[Column::text("lang_code")],
        operators: Operator::TEXT,
        default_field: "lang_code",
        default_operator: Operator::Eq,
        sortable: &["id", "lang_code"],
    };
    type Entity = Language;
}

#[derive(Debug, Clone, Copy)]
pub struct Publishers;

impl Resource for Publishers {
    const SPEC: ResourceSpec = ResourceSpec {
        name: "publishers",
        table: "publishers",
        columns: "id, name, sort",
        fields: &[Column::text("name")],
        operators: Operator::TEXT,
        default_field: "name",
        default_operator: Operator::Eq,
        sortable: &["id", "name", "sort"],
    };
    type Entity = Publisher;
}

#[derive(Debug, Clone, Copy)]
pub struct Identifiers;

impl Resource for Identifiers {
    const SPEC: ResourceSpec = ResourceSpec {
        name: "identifiers",
        table: "identifiers",
        columns: "id, book, type, val",
        fields: &[Column::text("type"), Column::text("val")],
        operators: Operator::TEXT,
        default_field: "val",
        default_operator: Operator::Eq,
        sortable: &["id", "book", "type", "val"],
    };
    type Entity = Identifier;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check_spec(spec: &ResourceSpec) {
        assert!(
            spec.field(spec.default_field).is_some(),
            "{}: default field not whitelisted",
            spec.name
        );
        assert!(
            spec.allows(spec.default_operator),
            "{}: default operator not whitelisted",
            spec.name
        );
        assert_eq!(
            spec.sort_column("id"),
            Some("id"),
            "{}: id must be sortable",
            spec.name
        );
        for field in spec.fields {
            assert!(
                spec.columns.split(',').any(|c| c.trim() == field.name),
                "{}: field {} missing from select list",
                spec.name,
                field.name
            );
        }
        for sortable in spec.sortable {
            assert!(
                spec.columns.split(',').any(|c| c.trim() == *sortable),
                "{}: sort column {} missing from select list",
                spec.name,
                sortable
            );
        }
    }

    #[test]
    fn test_specs_are_self_consistent() {
        check_spec(&Authors::SPEC);
        check_spec(&Books::SPEC);
        check_spec(&Tags::SPEC);
        check_spec(&Ratings::SPEC);
        check_spec(&SeriesList::SPEC);
        check_spec(&Comments::SPEC);
        check_spec(&Data::SPEC);
        check_spec(&Languages::SPEC);
        check_spec(&Publishers::SPEC);
        check_spec(&Identifiers::SPEC);
    }

    #[test]
    fn test_field_lookup_is_case_sensitive() {
        assert!(Authors::SPEC.field("name").is_some());
        assert!(Authors::SPEC.field("Name").is_none());
        assert!(Authors::SPEC.field("name ").is_none());
    }

    #[test]
    fn test_sort_column_rejects_unlisted_identifiers() {
        assert_eq!(Books::SPEC.sort_column("title"), Some("title"));
        assert_eq!(Books::SPEC.sort_column("title; DROP TABLE books"), None);
        assert_eq!(Books::SPEC.sort_column("path"), None);
    }

    #[test]
    fn test_operator_asymmetry_between_data_and_ratings() {
        assert!(Data::SPEC.allows(Operator::Like));
        assert!(!Ratings::SPEC.allows(Operator::Like));
        assert!(Ratings::SPEC.allows(Operator::Gte));
    }
}
