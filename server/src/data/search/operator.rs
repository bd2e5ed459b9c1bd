//! Comparison operators
//!
//! Closed set of comparison semantics accepted in a lookup. Each operator
//! renders to a fixed SQL token; the pattern operators also wrap the bound
//! value with wildcards.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::data::sql::SqlDialect;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Operator {
    Eq,
    Neq,
    Gt,
    Lt,
    Gte,
    Lte,
    Like,
    Unlike,
}

impl Operator {
    pub const ALL: &'static [Operator] = &[
        Operator::Eq,
        Operator::Neq,
        Operator::Gt,
        Operator::Lt,
        Operator::Gte,
        Operator::Lte,
        Operator::Like,
        Operator::Unlike,
    ];

    /// Text and identifier columns
    pub const TEXT: &'static [Operator] =
        &[Operator::Eq, Operator::Neq, Operator::Like, Operator::Unlike];

    /// Numeric columns
    pub const NUMERIC: &'static [Operator] = &[
        Operator::Eq,
        Operator::Neq,
        Operator::Gt,
        Operator::Lt,
        Operator::Gte,
        Operator::Lte,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Eq => "EQ",
            Self::Neq => "NEQ",
            Self::Gt => "GT",
            Self::Lt => "LT",
            Self::Gte => "GTE",
            Self::Lte => "LTE",
            Self::Like => "LIKE",
            Self::Unlike => "UNLIKE",
        }
    }

    /// Whether this operator matches a wildcard pattern rather than a value
    pub fn is_pattern(&self) -> bool {
        matches!(self, Self::Like | Self::Unlike)
    }

    /// SQL comparison token for this operator
    pub fn sql_token(&self, dialect: &dyn SqlDialect) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Neq => "<>",
            Self::Gt => ">",
            Self::Lt => "<",
            Self::Gte => ">=",
            Self::Lte => "<=",
            Self::Like => dialect.like(false),
            Self::Unlike => dialect.like(true),
        }
    }

    /// Value to bind for this operator.
    ///
    /// Pattern operators wrap the raw value as `%value%`; everything else
    /// passes it through. Pure: calling it twice never double-wraps.
    pub fn lookup_value(&self, raw: &str) -> String {
        if self.is_pattern() {
            format!("%{}%", raw)
        } else {
            raw.to_string()
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::sql::{PostgresDialect, SqliteDialect};

    #[test]
    fn test_pattern_operators_wrap_value() {
        assert_eq!(Operator::Like.lookup_value("one"), "%one%");
        assert_eq!(Operator::Unlike.lookup_value("one"), "%one%");
    }

    #[test]
    fn test_comparison_operators_pass_value_through() {
        for op in [
            Operator::Eq,
            Operator::Neq,
            Operator::Gt,
            Operator::Lt,
            Operator::Gte,
            Operator::Lte,
        ] {
            assert_eq!(op.lookup_value("one"), "one", "operator {}", op);
        }
    }

    #[test]
    fn test_lookup_value_is_idempotent() {
        let first = Operator::Like.lookup_value("Du");
        let second = Operator::Like.lookup_value("Du");
        assert_eq!(first, second);
        assert_eq!(first, "%Du%");
    }

    #[test]
    fn test_sql_tokens() {
        let sqlite = SqliteDialect;
        assert_eq!(Operator::Eq.sql_token(&sqlite), "=");
        assert_eq!(Operator::Neq.sql_token(&sqlite), "<>");
        assert_eq!(Operator::Gt.sql_token(&sqlite), ">");
        assert_eq!(Operator::Lt.sql_token(&sqlite), "<");
        assert_eq!(Operator::Gte.sql_token(&sqlite), ">=");
        assert_eq!(Operator::Lte.sql_token(&sqlite), "<=");
        assert_eq!(Operator::Like.sql_token(&sqlite), "LIKE");
        assert_eq!(Operator::Unlike.sql_token(&sqlite), "NOT LIKE");

        let postgres = PostgresDialect;
        assert_eq!(Operator::Like.sql_token(&postgres), "ILIKE");
        assert_eq!(Operator::Unlike.sql_token(&postgres), "NOT ILIKE");
    }

    #[test]
    fn test_serde_uses_exact_upper_case_names() {
        let op: Operator = serde_json::from_str("\"UNLIKE\"").unwrap();
        assert_eq!(op, Operator::Unlike);
        assert!(serde_json::from_str::<Operator>("\"like\"").is_err());
        assert!(serde_json::from_str::<Operator>("\"Eq\"").is_err());
        assert_eq!(serde_json::to_string(&Operator::Gte).unwrap(), "\"GTE\"");
    }

    #[test]
    fn test_as_str_matches_display() {
        for op in Operator::ALL {
            assert_eq!(op.to_string(), op.as_str());
        }
    }
}
