//! Bundle / collection / product hierarchy handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
};
use tokio::sync::RwLock;

use super::{decode, not_found, search_response, SearchQuery};
use crate::mock_server::state::MockState;
use crate::Product;

fn walk<'a>(
    state: &'a MockState,
    identifier: &str,
    depth: usize,
    step: fn(&'a MockState, &str) -> Option<Vec<&'a Product>>,
) -> Option<Vec<&'a Product>> {
    let mut level = step(state, identifier)?;
    for _ in 1..depth {
        let mut next: Vec<&Product> = level
            .iter()
            .filter_map(|p| p.id.as_deref())
            .filter_map(|id| step(state, id))
            .flatten()
            .collect();
        next.sort_by(|a, b| a.id.cmp(&b.id));
        next.dedup_by(|a, b| a.id == b.id);
        level = next;
    }
    level.sort_by(|a, b| a.id.cmp(&b.id));
    Some(level)
}

async fn respond(
    state: Arc<RwLock<MockState>>,
    identifier: String,
    query: SearchQuery,
    depth: usize,
    step: for<'a> fn(&'a MockState, &str) -> Option<Vec<&'a Product>>,
) -> axum::response::Response {
    let identifier = decode(identifier);
    let state = state.read().await;

    match walk(&state, &identifier, depth, step) {
        Some(products) => search_response(products, &query),
        None => not_found(&identifier),
    }
}

/// GET /products/{identifier}/members
pub async fn list_members(
    State(state): State<Arc<RwLock<MockState>>>,
    Path(identifier): Path<String>,
    Query(query): Query<SearchQuery>,
) -> impl IntoResponse {
    respond(state, identifier, query, 1, MockState::members_of).await
}

/// GET /products/{identifier}/members/members
pub async fn list_nested_members(
    State(state): State<Arc<RwLock<MockState>>>,
    Path(identifier): Path<String>,
    Query(query): Query<SearchQuery>,
) -> impl IntoResponse {
    respond(state, identifier, query, 2, MockState::members_of).await
}

/// GET /products/{identifier}/member-of
pub async fn list_member_of(
    State(state): State<Arc<RwLock<MockState>>>,
    Path(identifier): Path<String>,
    Query(query): Query<SearchQuery>,
) -> impl IntoResponse {
    respond(state, identifier, query, 1, MockState::parents_of).await
}

/// GET /products/{identifier}/member-of/member-of
pub async fn list_nested_member_of(
    State(state): State<Arc<RwLock<MockState>>>,
    Path(identifier): Path<String>,
    Query(query): Query<SearchQuery>,
) -> impl IntoResponse {
    respond(state, identifier, query, 2, MockState::parents_of).await
}
