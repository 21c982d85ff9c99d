//! HTTP request handlers for the mock server.

pub mod hierarchy;
pub mod products;

pub use hierarchy::*;
pub use products::*;

use std::collections::BTreeMap;

use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::Deserialize;

use super::filter::{field_values, Filter};
use crate::query::{DEFAULT_FACET_LIMIT, DEFAULT_LIMIT};
use crate::Product;

/// Query parameters shared by every search endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
    /// Accepted but ignored; full products are always returned.
    pub fields: Option<String>,
    pub limit: Option<u32>,
    #[serde(rename = "search-after")]
    pub search_after: Option<String>,
    #[serde(rename = "facet-fields")]
    pub facet_fields: Option<String>,
    #[serde(rename = "facet-limit")]
    pub facet_limit: Option<u32>,
}

impl SearchQuery {
    /// The parsed `q` expression.
    pub fn filter(&self) -> Filter {
        self.q.as_deref().map(Filter::parse).unwrap_or_default()
    }
}

/// Decode a path segment that may still be percent-encoded.
pub(crate) fn decode(segment: String) -> String {
    urlencoding::decode(&segment)
        .map(|s| s.into_owned())
        .unwrap_or(segment)
}

pub(crate) fn not_found(identifier: &str) -> axum::response::Response {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({
            "error": "Not Found",
            "message": format!("No product found with identifier: {}", identifier)
        })),
    )
        .into_response()
}

pub(crate) fn bad_request(message: String) -> axum::response::Response {
    (
        StatusCode::BAD_REQUEST,
        Json(serde_json::json!({ "error": "Bad Request", "message": message })),
    )
        .into_response()
}

/// Build a Registry search response: one page after the cursor, with the
/// hit count and facets computed over every match.
pub(crate) fn search_response(matches: Vec<&Product>, query: &SearchQuery) -> axum::response::Response {
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT);
    if limit == 0 {
        return bad_request("limit must be at least 1".to_string());
    }

    let cursor = query.search_after.as_deref().unwrap_or_default();
    let page: Vec<&Product> = matches
        .iter()
        .copied()
        .filter(|p| cursor.is_empty() || p.id.as_deref().unwrap_or_default() > cursor)
        .take(limit as usize)
        .collect();

    let search_after: Vec<String> = page
        .last()
        .and_then(|p| p.id.clone())
        .into_iter()
        .collect();

    let facet_limit = query.facet_limit.unwrap_or(DEFAULT_FACET_LIMIT) as usize;
    let facets: Vec<serde_json::Value> = query
        .facet_fields
        .as_deref()
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .map(|field| {
            let counts = facet_counts(&matches, field, facet_limit);
            serde_json::json!({ "property": field, "type": "terms", "counts": counts })
        })
        .collect();

    Json(serde_json::json!({
        "summary": {
            "q": query.q.clone().unwrap_or_default(),
            "hits": matches.len(),
            "took": 0,
            "limit": limit,
            "search_after": search_after,
            "properties": [],
        },
        "data": page,
        "facets": facets,
    }))
    .into_response()
}

/// The `limit` most populous values of a field across the matches.
fn facet_counts(matches: &[&Product], field: &str, limit: usize) -> BTreeMap<String, u64> {
    let mut counts: BTreeMap<String, u64> = BTreeMap::new();
    for product in matches {
        for value in field_values(product, field) {
            *counts.entry(value).or_default() += 1;
        }
    }

    let mut buckets: Vec<(String, u64)> = counts.into_iter().collect();
    // Ties keep value order
    buckets.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    buckets.truncate(limit);
    buckets.into_iter().collect()
}
