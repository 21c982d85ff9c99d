//! MCP tool parameter types with JSON Schema support.

use schemars::JsonSchema;
use serde::Deserialize;

use crate::query::{combine, SearchParams, MAX_LIMIT};
use crate::{Direction, ProductClass};

/// Parameters for the `search_products` MCP tool.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct SearchProductsParams {
    /// Registry query expression, e.g.
    /// `(title like "pluto") and (description like "pepssi")` or
    /// `ops:Provenance.ops:parent_collection_identifier eq "urn:nasa:pds:cassini_iss_saturn:data_raw::1.0"`.
    #[serde(default)]
    pub query: Option<String>,
    /// Keywords that must each appear in the title or description.
    #[serde(default)]
    pub keywords: Vec<String>,
    /// Restrict to one product class (default: any).
    #[serde(default)]
    pub class: Option<ProductClass>,
    /// Fields to return (default: id, lid, title, description).
    #[serde(default)]
    pub fields: Vec<String>,
    /// Maximum number of results (default 10, max 100).
    #[serde(default)]
    pub limit: Option<u32>,
    /// Fields to sort by, ascending.
    #[serde(default)]
    pub sort: Vec<String>,
    /// Sort values of the last result of the previous page.
    #[serde(default)]
    pub search_after: Vec<String>,
    /// Fields to aggregate into facet buckets.
    #[serde(default)]
    pub facet_fields: Vec<String>,
    /// Number of buckets per facet (default 10).
    #[serde(default)]
    pub facet_limit: Option<u32>,
}

impl SearchProductsParams {
    /// Merge onto the given defaults.
    pub fn into_search(self, defaults: SearchParams) -> SearchParams {
        let query = combine(self.query.as_deref(), &self.keywords);
        defaults.merged_with(SearchParams {
            query,
            fields: self.fields,
            limit: self.limit.map(cap_limit),
            sort: self.sort,
            search_after: self.search_after,
            facet_fields: self.facet_fields,
            facet_limit: self.facet_limit,
        })
    }
}

/// Parameters for the `search_collections` and `search_bundles` MCP tools.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct SearchClassParams {
    /// Registry query expression, e.g. `(title like "moon") and (description like "seismic")`.
    #[serde(default)]
    pub query: Option<String>,
    /// Keywords that must each appear in the title or description.
    #[serde(default)]
    pub keywords: Vec<String>,
    /// Fields to return (default: lid, title, description and the ref_lid_* references).
    #[serde(default)]
    pub fields: Vec<String>,
    /// Maximum number of results (default 10, max 100).
    #[serde(default)]
    pub limit: Option<u32>,
    /// Fields to sort by, ascending.
    #[serde(default)]
    pub sort: Vec<String>,
    /// Sort values of the last result of the previous page.
    #[serde(default)]
    pub search_after: Vec<String>,
    /// Fields to aggregate into facet buckets.
    #[serde(default)]
    pub facet_fields: Vec<String>,
    /// Number of buckets per facet (default 10).
    #[serde(default)]
    pub facet_limit: Option<u32>,
}

impl From<SearchClassParams> for SearchProductsParams {
    fn from(p: SearchClassParams) -> Self {
        Self {
            query: p.query,
            keywords: p.keywords,
            class: None,
            fields: p.fields,
            limit: p.limit,
            sort: p.sort,
            search_after: p.search_after,
            facet_fields: p.facet_fields,
            facet_limit: p.facet_limit,
        }
    }
}

/// Parameters for the `search_investigations` MCP tool.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct SearchInvestigationsParams {
    /// Keywords matched together as one phrase against title and description.
    #[serde(default)]
    pub keywords: Vec<String>,
    /// Maximum number of results (default 10, max 100).
    #[serde(default)]
    pub limit: Option<u32>,
}

/// Parameters for the `get_product` MCP tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GetProductParams {
    /// LID or LIDVID, e.g. `urn:nasa:pds:context:target:planet.mars`.
    pub identifier: String,
    /// Return every registered version instead of the latest.
    #[serde(default)]
    pub all_versions: bool,
}

/// Parameters for the `list_members` MCP tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ListMembersParams {
    /// LID or LIDVID of the bundle, collection or product.
    pub identifier: String,
    /// `members` lists children, `member_of` lists parents (default: members).
    #[serde(default)]
    pub direction: Direction,
    /// Skip a level: bundle to products, or product to bundle.
    #[serde(default)]
    pub nested: bool,
    /// Fields to return (default: id, lid, title, description).
    #[serde(default)]
    pub fields: Vec<String>,
    /// Maximum number of results (default 10, max 100).
    #[serde(default)]
    pub limit: Option<u32>,
    /// Sort values of the last result of the previous page.
    #[serde(default)]
    pub search_after: Vec<String>,
}

/// Parameters for the `get_download_links` MCP tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct DownloadLinksParams {
    /// LID or LIDVID of the product.
    pub identifier: String,
    /// Also collect links of member products (for collections and bundles).
    #[serde(default)]
    pub include_members: bool,
    /// Maximum number of member products (default 10, max 100).
    #[serde(default)]
    pub limit: Option<u32>,
}

/// Parameters for tools that take no arguments.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct NoParams {}

/// Clamp a caller-supplied limit to what a tool call may request.
pub(crate) fn cap_limit(limit: u32) -> u32 {
    limit.min(MAX_LIMIT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{CLASS_FIELDS, DEFAULT_LIMIT};

    #[test]
    fn search_products_schema_generates() {
        let schema = schemars::schema_for!(SearchProductsParams);
        let json = serde_json::to_string(&schema).unwrap();
        assert!(json.contains("query"));
        assert!(json.contains("keywords"));
        assert!(json.contains("search_after"));
        assert!(json.contains("facet_fields"));
        assert!(json.contains("collection"));
    }

    #[test]
    fn list_members_schema_has_directions() {
        let schema = schemars::schema_for!(ListMembersParams);
        let json = serde_json::to_string(&schema).unwrap();
        assert!(json.contains("identifier"));
        assert!(json.contains("member_of"));
        assert!(json.contains("nested"));
    }

    #[test]
    fn get_product_params_deserializes() {
        let json = r#"{"identifier": "urn:nasa:pds:context:target:planet.mars"}"#;
        let params: GetProductParams = serde_json::from_str(json).unwrap();
        assert_eq!(params.identifier, "urn:nasa:pds:context:target:planet.mars");
        assert!(!params.all_versions);
    }

    #[test]
    fn list_members_params_defaults() {
        let json = r#"{"identifier": "urn:nasa:pds:a"}"#;
        let params: ListMembersParams = serde_json::from_str(json).unwrap();
        assert_eq!(params.direction, Direction::Members);
        assert!(!params.nested);
        assert!(params.fields.is_empty());
        assert!(params.limit.is_none());
    }

    #[test]
    fn search_params_deserialize_from_empty_object() {
        let params: SearchProductsParams = serde_json::from_str("{}").unwrap();
        assert!(params.query.is_none());
        assert!(params.class.is_none());
        let search = params.into_search(SearchParams::products());
        assert_eq!(search, SearchParams::products());
    }

    #[test]
    fn into_search_caps_limit_and_combines_keywords() {
        let params = SearchProductsParams {
            query: Some("(lid like \"urn:nasa:pds:*\")".to_string()),
            keywords: vec!["pluto".to_string()],
            limit: Some(500),
            ..Default::default()
        };
        let search = params.into_search(SearchParams::products());
        assert_eq!(search.limit, Some(MAX_LIMIT));
        let q = search.query.unwrap();
        assert!(q.contains("lid like"));
        assert!(q.contains("title like \"pluto\""));
    }

    #[test]
    fn class_params_keep_class_defaults() {
        let params: SearchClassParams = serde_json::from_str(r#"{"keywords": ["moon"]}"#).unwrap();
        let search = SearchProductsParams::from(params).into_search(SearchParams::classes());
        assert_eq!(search.fields.len(), CLASS_FIELDS.len());
        assert_eq!(search.limit, Some(DEFAULT_LIMIT));
    }
}
