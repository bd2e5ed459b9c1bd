//! Safe dynamic-query filter and pagination engine
//!
//! A request names one resource, one `(field, operator, value)` lookup and a
//! page window. Fields, operators and sort columns are checked against the
//! resource's static whitelist; only identifiers taken from those static
//! tables are ever written into SQL text, while the value, limit and offset
//! are always bound as parameters.
//!
//! ## Usage
//!
//! ```no_run
//! use bookshelf_server::data::search::{Authors, Search};
//! use validator::Validate;
//!
//! let body = r#"{
//!     "query": {"field": "name", "operator": "EQ", "value": "Asimov"},
//!     "pagination": {"start": 0, "limit": 10}
//! }"#;
//! let search: Search<Authors> = serde_json::from_str(body).unwrap();
//! assert!(search.validate().is_ok());
//! ```

mod dispatcher;
mod lookup;
mod operator;
mod pagination;
mod resources;
mod violation;

pub use dispatcher::{BindValue, QueryDispatcher, SearchQuery, build_get_by_id, build_search};
pub use lookup::ColumnLookup;
pub use operator::Operator;
pub use pagination::{MAX_LIMIT, Pagination, Sort, SortDirection};
pub use resources::{
    Authors, Books, Column, ColumnKind, Comments, Data, Identifiers, Languages, Publishers,
    Ratings, Resource, ResourceSpec, SeriesList, Tags,
};
pub use violation::{Violation, Violations};

use std::borrow::Cow;

use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors, ValidationErrorsKind};

use violation::{one_of_message, rejected};

use crate::data::DataError;

pub type AuthorLookup = ColumnLookup<Authors>;
pub type BookLookup = ColumnLookup<Books>;
pub type TagLookup = ColumnLookup<Tags>;
pub type RatingLookup = ColumnLookup<Ratings>;
pub type SeriesLookup = ColumnLookup<SeriesList>;
pub type CommentLookup = ColumnLookup<Comments>;
pub type DataLookup = ColumnLookup<Data>;
pub type LanguageLookup = ColumnLookup<Languages>;
pub type PublisherLookup = ColumnLookup<Publishers>;
pub type IdentifierLookup = ColumnLookup<Identifiers>;

/// One search request: a lookup plus a page window, validated as a unit
#[derive(Debug, Clone, Deserialize)]
#[serde(bound = "")]
pub struct Search<R> {
    pub query: ColumnLookup<R>,
    pub pagination: Pagination,
}

impl<R: Resource> Search<R> {
    pub fn new(query: ColumnLookup<R>, pagination: Pagination) -> Self {
        Self { query, pagination }
    }

    /// Every violation in the request; empty when valid
    pub fn violations(&self) -> Violations {
        match self.validate() {
            Ok(()) => Violations::default(),
            Err(e) => Violations::from(&e),
        }
    }
}

impl<R: Resource> Search<R> {
    /// Pagination errors plus the sort field checked against `R`'s sortable columns
    fn pagination_errors(&self) -> Result<(), ValidationErrors> {
        let mut errors = self.pagination.validate().err().unwrap_or_default();

        let sort = &self.pagination.sort;
        if R::SPEC.sort_column(&sort.field).is_none() {
            let mut nested = match errors.errors_mut().remove("sort") {
                Some(ValidationErrorsKind::Struct(nested)) => *nested,
                _ => ValidationErrors::new(),
            };
            nested.add(
                "field",
                rejected(
                    "sort_field_not_allowed",
                    one_of_message(R::SPEC.sortable.iter().copied()),
                    &sort.field,
                ),
            );
            errors.errors_mut().insert(
                Cow::Borrowed("sort"),
                ValidationErrorsKind::Struct(Box::new(nested)),
            );
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

impl<R: Resource> Validate for Search<R> {
    /// Validates both halves and unions their errors; never stops at the first
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.merge_self("query", self.query.validate());
        errors.merge_self("pagination", self.pagination_errors());
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Search engine error
#[derive(Error, Debug)]
pub enum SearchError {
    /// Request rejected before any SQL ran
    #[error("Invalid search: {}", .0.summary())]
    Invalid(Violations),

    /// Failure reported by the database, passed through untouched
    #[error(transparent)]
    Persistence(#[from] DataError),
}

impl From<ValidationErrors> for SearchError {
    fn from(errors: ValidationErrors) -> Self {
        Self::Invalid(Violations::from(&errors))
    }
}
