//! Pagination and sort bounds

use std::borrow::Cow;

use serde::Deserialize;
use validator::{Validate, ValidationError};

/// Largest page a single request may ask for
pub const MAX_LIMIT: i64 = 100;

/// Column every page is ordered by when the request names none
pub const DEFAULT_SORT_FIELD: &str = "id";

pub const SORT_ASC: &str = "asc";
pub const SORT_DESC: &str = "desc";

/// Offset/limit window plus ordering
///
/// Out-of-range values are rejected, never clipped.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct Pagination {
    #[validate(range(min = 0, message = "must be greater than or equal to 0"))]
    pub start: i64,

    #[validate(range(min = 0, max = 100, message = "must be between 0 and 100"))]
    pub limit: i64,

    #[serde(default)]
    #[validate(nested)]
    pub sort: Sort,
}

impl Pagination {
    pub fn new(start: i64, limit: i64) -> Self {
        Self {
            start,
            limit,
            sort: Sort::default(),
        }
    }

    pub fn with_sort(mut self, sort: Sort) -> Self {
        self.sort = sort;
        self
    }
}

/// Ordering column and direction.
///
/// `field` is not checked here; the dispatcher resolves it against the
/// resource's sortable columns and rejects anything else.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct Sort {
    pub field: String,

    #[validate(custom(function = "validate_direction"))]
    pub direction: String,
}

impl Sort {
    pub fn new(field: impl Into<String>, direction: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: direction.into(),
        }
    }
}

impl Default for Sort {
    fn default() -> Self {
        Self::new(DEFAULT_SORT_FIELD, SORT_ASC)
    }
}

/// Parsed sort direction; the only values that reach `ORDER BY`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    /// Exact, case-sensitive parse of `asc` / `desc`
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            SORT_ASC => Some(Self::Asc),
            SORT_DESC => Some(Self::Desc),
            _ => None,
        }
    }

    pub fn to_sql(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

fn validate_direction(direction: &str) -> Result<(), ValidationError> {
    if SortDirection::parse(direction).is_some() {
        return Ok(());
    }
    let mut error = ValidationError::new("sort_direction")
        .with_message(Cow::Borrowed("must be one of [asc, desc]"));
    error.add_param(Cow::Borrowed("value"), &direction);
    Err(error)
}
