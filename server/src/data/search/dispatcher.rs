//! Query dispatcher
//!
//! Turns a validated [`Search`] into one parameterized statement, runs it on
//! a pooled connection and maps the rows into the resource's entity type.
//!
//! Identifier positions (table, select list, filter column, sort column,
//! direction) are filled only from the resource's static spec. The caller's
//! field and sort names are used as lookup keys, never as SQL text, so an
//! unknown name fails closed here even if upstream validation was skipped.

use std::sync::Arc;

use sqlx::{PgPool, SqlitePool};
use validator::Validate;

use super::pagination::{DEFAULT_SORT_FIELD, SortDirection};
use super::resources::{ColumnKind, Resource};
use super::violation::{Violation, Violations, one_of_message};
use super::{Search, SearchError};
use crate::data::DatabaseService;
use crate::data::DataError;
use crate::data::sql::Backend;

/// A value bound through the driver's parameter mechanism
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindValue {
    Text(String),
    Integer(i64),
}

/// Assembled statement plus its parameters, in placeholder order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub sql: String,
    pub params: Vec<BindValue>,
}

fn rejected(path: &str, message: String, value: &str) -> SearchError {
    SearchError::Invalid(Violations::single(Violation::new(path, message, value)))
}

/// Assemble the filtered, ordered, paged SELECT for a search
pub fn build_search<R: Resource>(
    backend: Backend,
    search: &Search<R>,
) -> Result<SearchQuery, SearchError> {
    let spec = &R::SPEC;
    let dialect = backend.dialect();
    let lookup = &search.query;
    let operator = lookup.operator();

    let column = spec.field(lookup.field()).ok_or_else(|| {
        rejected(
            "query.field",
            one_of_message(spec.field_names()),
            lookup.field(),
        )
    })?;

    if !spec.allows(operator) {
        return Err(rejected(
            "query.operator",
            one_of_message(spec.operators.iter().map(|op| op.as_str())),
            operator.as_str(),
        ));
    }

    let sort = &search.pagination.sort;
    let sort_column = spec.sort_column(&sort.field).ok_or_else(|| {
        rejected(
            "pagination.sort.field",
            one_of_message(spec.sortable.iter().copied()),
            &sort.field,
        )
    })?;
    let direction = SortDirection::parse(&sort.direction).ok_or_else(|| {
        rejected(
            "pagination.sort.direction",
            "must be one of [asc, desc]".to_string(),
            &sort.direction,
        )
    })?;

    let (target, value) = match column.kind {
        ColumnKind::Text if operator.is_pattern() => (
            column.name.to_string(),
            BindValue::Text(lookup.lookup_value()),
        ),
        // Comparisons are case-sensitive on every backend
        ColumnKind::Text => (
            dialect.exact_text(column.name),
            BindValue::Text(lookup.lookup_value()),
        ),
        // Pattern match against the text rendering of the number
        ColumnKind::Integer if operator.is_pattern() => (
            dialect.cast_to_string(column.name),
            BindValue::Text(lookup.lookup_value()),
        ),
        ColumnKind::Integer => {
            let parsed = lookup.value().parse::<i64>().map_err(|_| {
                rejected(
                    "query.value",
                    "must be an integer".to_string(),
                    lookup.value(),
                )
            })?;
            (column.name.to_string(), BindValue::Integer(parsed))
        }
    };

    // Ties on a non-unique sort column are broken by id so pages never overlap
    let order = if sort_column == DEFAULT_SORT_FIELD {
        format!("{} {}", sort_column, direction.to_sql())
    } else {
        format!(
            "{} {}, {} {}",
            sort_column,
            direction.to_sql(),
            DEFAULT_SORT_FIELD,
            direction.to_sql()
        )
    };

    let sql = format!(
        "SELECT {} FROM {} WHERE {} {} {} ORDER BY {} {}",
        spec.columns,
        spec.table,
        target,
        operator.sql_token(dialect),
        dialect.placeholder(1),
        order,
        dialect.limit_offset(2),
    );

    Ok(SearchQuery {
        sql,
        params: vec![
            value,
            BindValue::Integer(search.pagination.limit),
            BindValue::Integer(search.pagination.start),
        ],
    })
}

/// Assemble the direct lookup by primary key
pub fn build_get_by_id<R: Resource>(backend: Backend) -> String {
    let spec = &R::SPEC;
    format!(
        "SELECT {} FROM {} WHERE id = {}",
        spec.columns,
        spec.table,
        backend.dialect().placeholder(1)
    )
}

/// Executes searches against the configured database
pub struct QueryDispatcher {
    database: Arc<DatabaseService>,
}

impl QueryDispatcher {
    pub fn new(database: Arc<DatabaseService>) -> Self {
        Self { database }
    }

    pub fn backend(&self) -> Backend {
        self.database.backend()
    }

    /// Validate, assemble and run a search; rows come back in page order
    pub async fn search<R: Resource>(
        &self,
        search: &Search<R>,
    ) -> Result<Vec<R::Entity>, SearchError> {
        search.validate()?;
        let query = build_search(self.backend(), search)?;

        tracing::debug!(
            resource = R::SPEC.name,
            field = search.query.field(),
            operator = %search.query.operator(),
            start = search.pagination.start,
            limit = search.pagination.limit,
            "Executing search"
        );
        tracing::trace!(sql = %query.sql, "Search statement");

        let rows = match self.database.as_ref() {
            DatabaseService::Sqlite(db) => fetch_all_sqlite::<R>(db.pool(), &query)
                .await
                .map_err(DataError::from_sqlite)?,
            DatabaseService::Postgres(db) => fetch_all_postgres::<R>(db.pool(), &query)
                .await
                .map_err(DataError::from_postgres)?,
        };

        tracing::debug!(resource = R::SPEC.name, rows = rows.len(), "Search complete");
        Ok(rows)
    }

    /// Fetch one entity by primary key, bypassing the filter machinery
    pub async fn get_by_id<R: Resource>(&self, id: i64) -> Result<Option<R::Entity>, SearchError> {
        let sql = build_get_by_id::<R>(self.backend());
        tracing::debug!(resource = R::SPEC.name, id, "Fetching by id");

        let row = match self.database.as_ref() {
            DatabaseService::Sqlite(db) => sqlx::query_as::<sqlx::Sqlite, R::Entity>(&sql)
                .bind(id)
                .fetch_optional(db.pool())
                .await
                .map_err(DataError::from_sqlite)?,
            DatabaseService::Postgres(db) => sqlx::query_as::<sqlx::Postgres, R::Entity>(&sql)
                .bind(id)
                .fetch_optional(db.pool())
                .await
                .map_err(DataError::from_postgres)?,
        };
        Ok(row)
    }
}

async fn fetch_all_sqlite<R: Resource>(
    pool: &SqlitePool,
    query: &SearchQuery,
) -> Result<Vec<R::Entity>, sqlx::Error> {
    let mut statement = sqlx::query_as::<sqlx::Sqlite, R::Entity>(&query.sql);
    for param in &query.params {
        statement = match param {
            BindValue::Text(s) => statement.bind(s.clone()),
            BindValue::Integer(i) => statement.bind(*i),
        };
    }
    statement.fetch_all(pool).await
}

async fn fetch_all_postgres<R: Resource>(
    pool: &PgPool,
    query: &SearchQuery,
) -> Result<Vec<R::Entity>, sqlx::Error> {
    let mut statement = sqlx::query_as::<sqlx::Postgres, R::Entity>(&query.sql);
    for param in &query.params {
        statement = match param {
            BindValue::Text(s) => statement.bind(s.clone()),
            BindValue::Integer(i) => statement.bind(*i),
        };
    }
    statement.fetch_all(pool).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::SqliteService;
    use crate::data::search::{
        AuthorLookup, Authors, BookLookup, Books, DataLookup, Operator, Pagination, RatingLookup,
        Ratings, Sort,
    };

    async fn setup_dispatcher() -> (QueryDispatcher, SqlitePool) {
        let pool = crate::data::sqlite::memory_pool().await;
        let database = DatabaseService::Sqlite(Arc::new(SqliteService::from_pool(pool.clone())));
        (QueryDispatcher::new(Arc::new(database)), pool)
    }

    async fn insert_book(pool: &SqlitePool, title: &str) {
        sqlx::query("INSERT INTO books (title, sort, author_sort) VALUES (?, ?, ?)")
            .bind(title)
            .bind(title)
            .bind("Herbert, Frank")
            .execute(pool)
            .await
            .unwrap();
    }

    fn title_search(operator: Operator, value: &str) -> Search<Books> {
        Search::new(
            BookLookup::new("title", operator, value),
            Pagination::new(0, 10),
        )
    }

    #[test]
    fn test_build_search_sqlite() {
        let query = build_search(Backend::Sqlite, &title_search(Operator::Like, "Du")).unwrap();
        assert_eq!(
            query.sql,
            format!(
                "SELECT {} FROM books WHERE title LIKE ? ORDER BY id ASC LIMIT ? OFFSET ?",
                Books::SPEC.columns
            )
        );
        assert_eq!(
            query.params,
            vec![
                BindValue::Text("%Du%".to_string()),
                BindValue::Integer(10),
                BindValue::Integer(0),
            ]
        );
    }

    #[test]
    fn test_build_search_postgres() {
        let search = Search::new(
            AuthorLookup::new("name", Operator::Unlike, "sim"),
            Pagination::new(20, 5).with_sort(Sort::new("name", "desc")),
        );
        let query = build_search(Backend::Postgres, &search).unwrap();
        assert_eq!(
            query.sql,
            "SELECT id, name, sort, link FROM authors WHERE name NOT ILIKE $1 \
             ORDER BY name DESC, id DESC LIMIT $2 OFFSET $3"
        );
        assert_eq!(
            query.params,
            vec![
                BindValue::Text("%sim%".to_string()),
                BindValue::Integer(5),
                BindValue::Integer(20),
            ]
        );
    }

    #[test]
    fn test_text_equality_is_binary_on_sqlite() {
        let sqlite = build_search(Backend::Sqlite, &title_search(Operator::Neq, "Dune")).unwrap();
        assert!(sqlite.sql.contains("WHERE title COLLATE BINARY <> ?"));
        let postgres =
            build_search(Backend::Postgres, &title_search(Operator::Eq, "Dune")).unwrap();
        assert!(postgres.sql.contains("WHERE title = $1"));
    }

    #[test]
    fn test_non_id_sort_breaks_ties_by_id() {
        let search = Search::new(
            BookLookup::new("title", Operator::Like, "Dune"),
            Pagination::new(0, 10).with_sort(Sort::new("author_sort", "asc")),
        );
        let query = build_search(Backend::Postgres, &search).unwrap();
        assert!(
            query
                .sql
                .ends_with("ORDER BY author_sort ASC, id ASC LIMIT $2 OFFSET $3"),
            "{}",
            query.sql
        );
    }

    #[test]
    fn test_value_never_reaches_sql_text() {
        let hostile = "x' OR '1'='1";
        let query = build_search(Backend::Sqlite, &title_search(Operator::Eq, hostile)).unwrap();
        assert!(!query.sql.contains(hostile));
        assert_eq!(query.params[0], BindValue::Text(hostile.to_string()));
    }

    #[test]
    fn test_unsortable_field_fails_closed() {
        let search = Search::new(
            BookLookup::new("title", Operator::Eq, "Dune"),
            Pagination::new(0, 10).with_sort(Sort::new("id; DROP TABLE books", "asc")),
        );
        match build_search(Backend::Sqlite, &search) {
            Err(SearchError::Invalid(violations)) => {
                assert_eq!(violations.len(), 1);
                assert_eq!(violations.at("pagination.sort.field").count(), 1);
            }
            other => panic!("expected sort rejection, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_field_fails_closed_without_validation() {
        let search = Search::new(
            BookLookup::new("title = title OR 1", Operator::Eq, "x"),
            Pagination::new(0, 10),
        );
        assert!(matches!(
            build_search(Backend::Sqlite, &search),
            Err(SearchError::Invalid(_))
        ));
    }

    #[test]
    fn test_disallowed_operator_fails_closed_without_validation() {
        let search = Search::new(
            RatingLookup::new("rating", Operator::Like, "5"),
            Pagination::new(0, 10),
        );
        assert!(matches!(
            build_search(Backend::Sqlite, &search),
            Err(SearchError::Invalid(_))
        ));
    }

    #[test]
    fn test_integer_comparison_binds_integer() {
        let search = Search::new(
            RatingLookup::new("rating", Operator::Gte, "8"),
            Pagination::new(0, 10),
        );
        let query = build_search(Backend::Postgres, &search).unwrap();
        assert!(query.sql.contains("WHERE rating >= $1"));
        assert_eq!(query.params[0], BindValue::Integer(8));
    }

    #[test]
    fn test_pattern_on_integer_column_casts_to_text() {
        let search = Search::new(
            DataLookup::new("uncompressed_size", Operator::Like, "12"),
            Pagination::new(0, 10),
        );
        let sqlite = build_search(Backend::Sqlite, &search).unwrap();
        assert!(
            sqlite
                .sql
                .contains("WHERE CAST(uncompressed_size AS TEXT) LIKE ?")
        );
        let postgres = build_search(Backend::Postgres, &search).unwrap();
        assert!(postgres.sql.contains("WHERE uncompressed_size::TEXT ILIKE $1"));
        assert_eq!(sqlite.params[0], BindValue::Text("%12%".to_string()));
    }

    #[test]
    fn test_build_get_by_id() {
        assert_eq!(
            build_get_by_id::<Ratings>(Backend::Sqlite),
            "SELECT id, rating FROM ratings WHERE id = ?"
        );
        assert_eq!(
            build_get_by_id::<Authors>(Backend::Postgres),
            "SELECT id, name, sort, link FROM authors WHERE id = $1"
        );
    }

    #[tokio::test]
    async fn test_search_exact_title() {
        let (dispatcher, pool) = setup_dispatcher().await;
        insert_book(&pool, "Dune").await;

        let books = dispatcher
            .search(&title_search(Operator::Eq, "Dune"))
            .await
            .unwrap();
        assert_eq!(books.len(), 1);
        assert_eq!(books[0].title, "Dune");
    }

    #[tokio::test]
    async fn test_search_like_matches_substring() {
        let (dispatcher, pool) = setup_dispatcher().await;
        insert_book(&pool, "Dune").await;

        let like = dispatcher
            .search(&title_search(Operator::Like, "Du"))
            .await
            .unwrap();
        assert_eq!(like.len(), 1);
        assert_eq!(like[0].title, "Dune");

        let eq = dispatcher
            .search(&title_search(Operator::Eq, "Du"))
            .await
            .unwrap();
        assert!(eq.is_empty());
    }

    #[tokio::test]
    async fn test_equality_is_case_sensitive() {
        let (dispatcher, pool) = setup_dispatcher().await;
        insert_book(&pool, "Dune").await;

        for value in ["dune", "dUNE"] {
            let eq = dispatcher
                .search(&title_search(Operator::Eq, value))
                .await
                .unwrap();
            assert!(eq.is_empty(), "EQ {} matched", value);
        }

        let neq = dispatcher
            .search(&title_search(Operator::Neq, "dune"))
            .await
            .unwrap();
        assert_eq!(neq.len(), 1);

        let like = dispatcher
            .search(&title_search(Operator::Like, "dune"))
            .await
            .unwrap();
        assert_eq!(like.len(), 1);
    }

    #[tokio::test]
    async fn test_pages_over_tied_sort_column_do_not_overlap() {
        let (dispatcher, pool) = setup_dispatcher().await;
        for title in ["Dune", "Dune Messiah", "Children of Dune", "God Emperor of Dune"] {
            insert_book(&pool, title).await;
        }

        let page = |start| {
            Search::new(
                BookLookup::new("title", Operator::Like, "Dune"),
                Pagination::new(start, 2).with_sort(Sort::new("author_sort", "desc")),
            )
        };
        let first = dispatcher.search(&page(0)).await.unwrap();
        let second = dispatcher.search(&page(2)).await.unwrap();
        let ids: Vec<i64> = first.iter().chain(second.iter()).map(|b| b.id).collect();
        assert_eq!(ids, vec![4, 3, 2, 1]);
    }

    #[tokio::test]
    async fn test_search_twice_does_not_rewrap_value() {
        let (dispatcher, pool) = setup_dispatcher().await;
        insert_book(&pool, "Dune").await;

        let search = title_search(Operator::Like, "Du");
        assert_eq!(dispatcher.search(&search).await.unwrap().len(), 1);
        assert_eq!(dispatcher.search(&search).await.unwrap().len(), 1);
        assert_eq!(search.query.lookup_value(), "%Du%");
    }

    #[tokio::test]
    async fn test_unlike_excludes_matches() {
        let (dispatcher, pool) = setup_dispatcher().await;
        insert_book(&pool, "Dune").await;
        insert_book(&pool, "Foundation").await;

        let books = dispatcher
            .search(&title_search(Operator::Unlike, "Du"))
            .await
            .unwrap();
        assert_eq!(books.len(), 1);
        assert_eq!(books[0].title, "Foundation");
    }

    #[tokio::test]
    async fn test_pagination_and_sort_order() {
        let (dispatcher, pool) = setup_dispatcher().await;
        for title in ["Dune", "Dune Messiah", "Children of Dune", "God Emperor of Dune"] {
            insert_book(&pool, title).await;
        }

        let search = Search::new(
            BookLookup::new("title", Operator::Like, "Dune"),
            Pagination::new(1, 2).with_sort(Sort::new("title", "desc")),
        );
        let books = dispatcher.search(&search).await.unwrap();
        let titles: Vec<&str> = books.iter().map(|b| b.title.as_str()).collect();
        assert_eq!(titles, vec!["Dune Messiah", "Dune"]);
    }

    #[tokio::test]
    async fn test_zero_limit_returns_empty_page() {
        let (dispatcher, pool) = setup_dispatcher().await;
        insert_book(&pool, "Dune").await;

        let search = Search::new(
            BookLookup::new("title", Operator::Eq, "Dune"),
            Pagination::new(0, 0),
        );
        assert!(dispatcher.search(&search).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_search_never_reaches_database() {
        let (dispatcher, pool) = setup_dispatcher().await;
        pool.close().await;

        let search = Search::new(
            BookLookup::new("path", Operator::Eq, "x"),
            Pagination::new(-1, 101),
        );
        match dispatcher.search(&search).await {
            Err(SearchError::Invalid(violations)) => assert_eq!(violations.len(), 3),
            other => panic!("expected validation failure, got {:?}", other.map(|b| b.len())),
        }
    }

    #[tokio::test]
    async fn test_persistence_failure_is_passed_through() {
        let (dispatcher, pool) = setup_dispatcher().await;
        pool.close().await;

        let result = dispatcher.search(&title_search(Operator::Eq, "Dune")).await;
        assert!(matches!(result, Err(SearchError::Persistence(_))));
    }

    #[tokio::test]
    async fn test_integer_search_on_ratings() {
        let (dispatcher, pool) = setup_dispatcher().await;
        for rating in [2_i64, 6, 10] {
            sqlx::query("INSERT INTO ratings (rating) VALUES (?)")
                .bind(rating)
                .execute(&pool)
                .await
                .unwrap();
        }

        let search = Search::new(
            RatingLookup::new("rating", Operator::Gt, "5"),
            Pagination::new(0, 10).with_sort(Sort::new("rating", "desc")),
        );
        let ratings = dispatcher.search(&search).await.unwrap();
        let values: Vec<Option<i64>> = ratings.iter().map(|r| r.rating).collect();
        assert_eq!(values, vec![Some(10), Some(6)]);
    }

    #[tokio::test]
    async fn test_get_by_id() {
        let (dispatcher, pool) = setup_dispatcher().await;
        sqlx::query("INSERT INTO authors (name, sort) VALUES ('Isaac Asimov', 'Asimov, Isaac')")
            .execute(&pool)
            .await
            .unwrap();

        let author = dispatcher.get_by_id::<Authors>(1).await.unwrap().unwrap();
        assert_eq!(author.name, "Isaac Asimov");
        assert_eq!(author.sort.as_deref(), Some("Asimov, Isaac"));

        assert!(dispatcher.get_by_id::<Authors>(42).await.unwrap().is_none());
    }
}
