//! SQLite SQL dialect implementation

use super::SqlDialect;

/// SQLite SQL dialect
pub struct SqliteDialect;

impl SqlDialect for SqliteDialect {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn placeholder(&self, _index: usize) -> String {
        "?".to_string()
    }

    fn like(&self, negated: bool) -> &'static str {
        if negated { "NOT LIKE" } else { "LIKE" }
    }

    fn exact_text(&self, col: &str) -> String {
        format!("{} COLLATE BINARY", col)
    }

    fn cast_to_string(&self, col: &str) -> String {
        format!("CAST({} AS TEXT)", col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder() {
        let dialect = SqliteDialect;
        assert_eq!(dialect.placeholder(1), "?");
        assert_eq!(dialect.placeholder(5), "?");
    }

    #[test]
    fn test_like() {
        let dialect = SqliteDialect;
        assert_eq!(dialect.like(false), "LIKE");
        assert_eq!(dialect.like(true), "NOT LIKE");
    }

    #[test]
    fn test_exact_text_overrides_nocase() {
        assert_eq!(SqliteDialect.exact_text("title"), "title COLLATE BINARY");
    }

    #[test]
    fn test_limit_offset() {
        assert_eq!(SqliteDialect.limit_offset(2), "LIMIT ? OFFSET ?");
    }

    #[test]
    fn test_cast_to_string() {
        let dialect = SqliteDialect;
        assert_eq!(
            dialect.cast_to_string("uncompressed_size"),
            "CAST(uncompressed_size AS TEXT)"
        );
    }
}
