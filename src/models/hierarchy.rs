//! Bundle / collection / product hierarchy traversal.
//!
//! PDS4 archives nest observational products inside collections and
//! collections inside bundles. The Registry exposes both directions:
//! `members` walks down, `member-of` walks up, and doubling the segment
//! skips a level.

use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::client::PdsClient;
use crate::error::Result;
use crate::models::{Product, SearchResponse};
use crate::pagination::{collect_all, Page};
use crate::query::{identifier_segment, SearchParams, DEFAULT_LIMIT};

/// Which way to walk the hierarchy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Children: collections of a bundle, products of a collection.
    #[default]
    Members,
    /// Parents: the collection or bundle a product belongs to.
    MemberOf,
}

impl Direction {
    fn segment(&self) -> &'static str {
        match self {
            Direction::Members => "members",
            Direction::MemberOf => "member-of",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.segment())
    }
}

/// A hierarchy request: where to start and how far to go.
#[derive(Debug, Clone, Default)]
pub struct MembersQuery {
    /// Direction to walk.
    pub direction: Direction,
    /// Skip a level (bundle to products, product to bundle).
    pub nested: bool,
}

impl MembersQuery {
    /// Children of a product.
    pub fn members() -> Self {
        Self::default()
    }

    /// Parents of a product.
    pub fn member_of() -> Self {
        Self {
            direction: Direction::MemberOf,
            nested: false,
        }
    }

    /// Skip one level.
    #[must_use]
    pub fn nested(mut self, nested: bool) -> Self {
        self.nested = nested;
        self
    }

    /// Endpoint path for a validated, encoded identifier.
    fn path(&self, encoded_identifier: &str) -> String {
        let segment = self.direction.segment();
        if self.nested {
            format!("products/{encoded_identifier}/{segment}/{segment}")
        } else {
            format!("products/{encoded_identifier}/{segment}")
        }
    }
}

/// Get one page of a product's members or parents.
///
/// # Errors
///
/// Returns an error if the identifier is invalid, the product is unknown
/// or the request fails.
#[tracing::instrument(skip(client))]
pub async fn get_members_page(
    client: &PdsClient,
    identifier: &str,
    query: &MembersQuery,
    params: &SearchParams,
) -> Result<Page<Product>> {
    params.validate()?;
    let path = query.path(&identifier_segment(identifier)?);

    let data: SearchResponse = client
        .get_json_with_query(&path, params)
        .await
        .map_err(|e| e.or_not_found("Product", identifier))?;

    let limit = params.limit.or(data.summary.limit).unwrap_or(DEFAULT_LIMIT);
    Ok(data.into_results(limit).page)
}

/// Get every member or parent of a product, following cursors.
///
/// # Errors
///
/// Returns an error if any page request fails.
pub async fn get_members(
    client: &PdsClient,
    identifier: &str,
    query: &MembersQuery,
    params: &SearchParams,
) -> Result<Vec<Product>> {
    collect_all(params, move |page_params| async move {
        get_members_page(client, identifier, query, &page_params).await
    })
    .await
}

impl Product {
    /// Members of this product (one page).
    ///
    /// # Errors
    ///
    /// Returns an error if the product has no identifier or the request fails.
    pub async fn members(&self, client: &PdsClient, params: &SearchParams) -> Result<Page<Product>> {
        let id = self.require_identifier()?;
        get_members_page(client, id, &MembersQuery::members(), params).await
    }

    /// Parents of this product (one page).
    ///
    /// # Errors
    ///
    /// Returns an error if the product has no identifier or the request fails.
    pub async fn member_of(
        &self,
        client: &PdsClient,
        params: &SearchParams,
    ) -> Result<Page<Product>> {
        let id = self.require_identifier()?;
        get_members_page(client, id, &MembersQuery::member_of(), params).await
    }

    fn require_identifier(&self) -> Result<&str> {
        self.identifier()
            .ok_or_else(|| crate::PdsError::InvalidIdentifier(String::new()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn member_paths() {
        let id = "urn%3Anasa%3Apds%3Ax";
        assert_eq!(MembersQuery::members().path(id), format!("products/{id}/members"));
        assert_eq!(
            MembersQuery::members().nested(true).path(id),
            format!("products/{id}/members/members")
        );
        assert_eq!(MembersQuery::member_of().path(id), format!("products/{id}/member-of"));
        assert_eq!(
            MembersQuery::member_of().nested(true).path(id),
            format!("products/{id}/member-of/member-of")
        );
    }

    #[test]
    fn direction_deserializes_snake_case() {
        let d: Direction = serde_json::from_str("\"member_of\"").unwrap();
        assert_eq!(d, Direction::MemberOf);
        assert_eq!(Direction::default(), Direction::Members);
        assert_eq!(d.to_string(), "member-of");
    }
}
