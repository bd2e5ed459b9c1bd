//! Search and lookup endpoints, one pair per resource
//!
//! Every resource gets the same two handlers, instantiated for its marker
//! type, so the whitelist in force is always the resource's own.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::extractors::{EntityId, ValidatedJson};
use crate::api::types::ApiError;
use crate::data::search::{
    Authors, Books, Comments, Data, Identifiers, Languages, Publishers, QueryDispatcher,
    Ratings, Resource, Search, SeriesList, Tags,
};

/// Mount every resource under its path segment
pub fn routes(dispatcher: Arc<QueryDispatcher>) -> Router {
    Router::new()
        .merge(resource_routes::<Authors>(dispatcher.clone()))
        .merge(resource_routes::<Books>(dispatcher.clone()))
        .merge(resource_routes::<Tags>(dispatcher.clone()))
        .merge(resource_routes::<Ratings>(dispatcher.clone()))
        .merge(resource_routes::<SeriesList>(dispatcher.clone()))
        .merge(resource_routes::<Comments>(dispatcher.clone()))
        .merge(resource_routes::<Data>(dispatcher.clone()))
        .merge(resource_routes::<Languages>(dispatcher.clone()))
        .merge(resource_routes::<Publishers>(dispatcher.clone()))
        .merge(resource_routes::<Identifiers>(dispatcher))
}

fn resource_routes<R: Resource>(dispatcher: Arc<QueryDispatcher>) -> Router {
    let name = R::SPEC.name;
    Router::new()
        .route(&format!("/{}/search", name), post(search::<R>))
        .route(&format!("/{}/{{id}}", name), get(get_by_id::<R>))
        .with_state(dispatcher)
}

/// `POST /{resource}/search`
async fn search<R: Resource>(
    State(dispatcher): State<Arc<QueryDispatcher>>,
    ValidatedJson(search): ValidatedJson<Search<R>>,
) -> Result<Json<Vec<R::Entity>>, ApiError> {
    let rows = dispatcher.search(&search).await?;
    Ok(Json(rows))
}

/// `GET /{resource}/{id}`
async fn get_by_id<R: Resource>(
    State(dispatcher): State<Arc<QueryDispatcher>>,
    EntityId(id): EntityId,
) -> Result<Json<R::Entity>, ApiError> {
    dispatcher.get_by_id::<R>(id).await?.map(Json).ok_or_else(|| {
        ApiError::not_found(
            "NOT_FOUND",
            format!("No {} entry with id {}", R::SPEC.name, id),
        )
    })
}
