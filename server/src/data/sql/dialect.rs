//! Backend-specific SQL fragments used by the search dispatcher

/// Renders the statement fragments whose syntax differs per backend
///
/// Every method returns fixed tokens or wraps an identifier the caller has
/// already resolved from a static whitelist; nothing here sees user input.
pub trait SqlDialect: Send + Sync {
    fn name(&self) -> &'static str;

    /// Parameter placeholder for the given 1-based position
    ///
    /// - SQLite: `?`
    /// - PostgreSQL: `$1`, `$2`, ...
    fn placeholder(&self, index: usize) -> String;

    /// Case-insensitive "contains" comparison token
    ///
    /// - SQLite: `LIKE` / `NOT LIKE` (ASCII case-insensitive by default)
    /// - PostgreSQL: `ILIKE` / `NOT ILIKE`
    fn like(&self, negated: bool) -> &'static str;

    /// Text column wrapped for exact, case-sensitive comparison
    ///
    /// - SQLite: `col COLLATE BINARY` (calibre declares text columns `NOCASE`)
    /// - PostgreSQL: `col` unchanged
    fn exact_text(&self, col: &str) -> String;

    /// Render an integer column as text so it can be pattern matched
    ///
    /// - SQLite: `CAST(col AS TEXT)`
    /// - PostgreSQL: `col::TEXT`
    fn cast_to_string(&self, col: &str) -> String;

    /// Bound `LIMIT .. OFFSET ..` clause; limit takes `first`, offset `first + 1`
    fn limit_offset(&self, first: usize) -> String {
        format!(
            "LIMIT {} OFFSET {}",
            self.placeholder(first),
            self.placeholder(first + 1)
        )
    }
}
