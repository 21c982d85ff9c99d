//! Product and class endpoint handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use tokio::sync::RwLock;

use super::{bad_request, decode, not_found, search_response, SearchQuery};
use crate::mock_server::state::MockState;
use crate::ProductClass;

/// GET /products
pub async fn search_products(
    State(state): State<Arc<RwLock<MockState>>>,
    Query(query): Query<SearchQuery>,
) -> impl IntoResponse {
    let state = state.read().await;
    let matches = state.search(ProductClass::Any, &query.filter());
    search_response(matches, &query)
}

/// GET /classes/{class}
pub async fn search_class(
    State(state): State<Arc<RwLock<MockState>>>,
    Path(class): Path<String>,
    Query(query): Query<SearchQuery>,
) -> impl IntoResponse {
    let class: ProductClass = match class.parse() {
        Ok(c) => c,
        Err(e) => return bad_request(format!("{e}")),
    };

    let state = state.read().await;
    let matches = state.search(class, &query.filter());
    search_response(matches, &query)
}

/// GET /classes
pub async fn list_classes(State(state): State<Arc<RwLock<MockState>>>) -> impl IntoResponse {
    let state = state.read().await;
    (StatusCode::OK, Json(state.classes()))
}

/// GET /products/{identifier}
pub async fn get_product(
    State(state): State<Arc<RwLock<MockState>>>,
    Path(identifier): Path<String>,
) -> impl IntoResponse {
    let identifier = decode(identifier);
    let state = state.read().await;

    match state.resolve(&identifier) {
        Some(product) => (StatusCode::OK, Json(product.clone())).into_response(),
        None => not_found(&identifier),
    }
}

/// GET /products/{identifier}/all
pub async fn get_all_versions(
    State(state): State<Arc<RwLock<MockState>>>,
    Path(identifier): Path<String>,
) -> impl IntoResponse {
    let identifier = decode(identifier);
    let state = state.read().await;

    let versions = state.versions(&identifier);
    if versions.is_empty() {
        return not_found(&identifier);
    }
    search_response(versions, &SearchQuery::default())
}
