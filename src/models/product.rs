//! Product model and trait implementations.

use std::borrow::Cow;
use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::client::PdsClient;
use crate::error::Result;
use crate::models::{first_text, null_as_default, string_or_first, ProductClass};
use crate::pagination::{cursor_from_values, Page};
use crate::query::{identifier_segment, SearchParams, DEFAULT_LIMIT};
use crate::traits::{Get, Search};

/// A PDS4 product as returned by the Registry.
///
/// Products are bundles, collections, observational products, documents and
/// context products. The Registry flattens each product's XML label into
/// `properties`, keyed by namespaced attribute path (for example
/// `pds:Target_Identification.pds:name`). Keys the Registry adds beyond the
/// ones modeled here are kept in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// The LIDVID (e.g., "urn:nasa:pds:cassini_iss_saturn:data_raw::1.0").
    #[serde(default, deserialize_with = "string_or_first", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// The logical identifier, when requested as a field.
    #[serde(default, deserialize_with = "string_or_first", skip_serializing_if = "Option::is_none")]
    pub lid: Option<String>,

    /// Product title.
    #[serde(default, deserialize_with = "string_or_first", skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Product class (e.g., "Product_Collection").
    #[serde(
        rename = "type",
        default,
        deserialize_with = "string_or_first",
        skip_serializing_if = "Option::is_none"
    )]
    pub product_type: Option<String>,

    /// Product description.
    #[serde(default, deserialize_with = "string_or_first", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Start of the observation period.
    #[serde(default, deserialize_with = "string_or_first", skip_serializing_if = "Option::is_none")]
    pub start_date_time: Option<String>,

    /// End of the observation period.
    #[serde(default, deserialize_with = "string_or_first", skip_serializing_if = "Option::is_none")]
    pub stop_date_time: Option<String>,

    /// Investigations (missions) this product belongs to.
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "Vec::is_empty")]
    pub investigations: Vec<Reference>,

    /// Instruments, hosts and facilities involved in the observation.
    #[serde(
        default,
        alias = "observation_system_components",
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub observing_system_components: Vec<Reference>,

    /// Observation targets.
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "Vec::is_empty")]
    pub targets: Vec<Reference>,

    /// Registry bookkeeping.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ProductMetadata>,

    /// Flattened label attributes.
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, serde_json::Value>,

    /// Any other key returned by the Registry.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// Reference from a product to a related context product.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    /// Identifier of the referenced product.
    #[serde(default)]
    pub id: String,
    /// Registry URL of the referenced product.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
}

/// Registry metadata attached to a product.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductMetadata {
    /// PDS discipline node that archived the product.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_name: Option<String>,
    /// URL of the XML label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_url: Option<String>,
    /// Product version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// When the product was registered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_date_time: Option<String>,
    /// When the registration was last updated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_date_time: Option<String>,
}

impl Product {
    /// The most specific identifier available (LIDVID, else LID).
    pub fn identifier(&self) -> Option<&str> {
        self.id.as_deref().or(self.lid.as_deref())
    }

    /// The logical identifier.
    ///
    /// Taken from the `lid` field, the `lid` property, or the LIDVID with its
    /// version stripped.
    pub fn lid(&self) -> Option<&str> {
        self.lid
            .as_deref()
            .or_else(|| self.property_str("lid"))
            .or_else(|| self.id.as_deref().map(|id| id.split("::").next().unwrap_or(id)))
    }

    /// The version part of the LIDVID (e.g., "1.0").
    pub fn version(&self) -> Option<&str> {
        self.id
            .as_deref()
            .and_then(|id| id.split_once("::"))
            .map(|(_, vid)| vid)
            .or_else(|| self.property_str("vid"))
    }

    /// First value of a label attribute, rendered as text.
    ///
    /// Looks in `properties` first, then in the top-level keys (key-value
    /// responses put attributes there). Strings are borrowed; numbers and
    /// booleans are rendered.
    pub fn property(&self, key: &str) -> Option<Cow<'_, str>> {
        match self.raw_property(key)? {
            serde_json::Value::String(s) => Some(Cow::Borrowed(s.as_str())),
            serde_json::Value::Array(items) => items.iter().find_map(|v| match v {
                serde_json::Value::String(s) => Some(Cow::Borrowed(s.as_str())),
                other => first_text(other).map(Cow::Owned),
            }),
            other => first_text(other).map(Cow::Owned),
        }
    }

    // String-valued attributes only, for accessors that hand out `&str`.
    fn property_str(&self, key: &str) -> Option<&str> {
        match self.raw_property(key)? {
            serde_json::Value::String(s) => Some(s.as_str()),
            serde_json::Value::Array(items) => items.iter().find_map(|v| v.as_str()),
            _ => None,
        }
    }

    fn raw_property(&self, key: &str) -> Option<&serde_json::Value> {
        self.properties.get(key).or_else(|| self.extra.get(key))
    }

    /// Every value of a label attribute, rendered as text.
    pub fn property_values(&self, key: &str) -> Vec<String> {
        match self.raw_property(key) {
            Some(serde_json::Value::Array(items)) => items.iter().filter_map(first_text).collect(),
            Some(value) => first_text(value).into_iter().collect(),
            None => Vec::new(),
        }
    }

    /// Start of the observation period, if it parses as RFC 3339.
    pub fn start_time(&self) -> Option<DateTime<Utc>> {
        let raw = self
            .start_date_time
            .as_deref()
            .or_else(|| self.property_str("pds:Time_Coordinates.pds:start_date_time"))?;
        parse_timestamp(raw)
    }

    /// End of the observation period, if it parses as RFC 3339.
    pub fn stop_time(&self) -> Option<DateTime<Utc>> {
        let raw = self
            .stop_date_time
            .as_deref()
            .or_else(|| self.property_str("pds:Time_Coordinates.pds:stop_date_time"))?;
        parse_timestamp(raw)
    }

    /// URL of the product's XML label.
    pub fn label_url(&self) -> Option<&str> {
        self.metadata
            .as_ref()
            .and_then(|m| m.label_url.as_deref())
            .or_else(|| self.property_str("ops:Label_File_Info.ops:file_ref"))
    }

    /// Every registered version of a product.
    ///
    /// # Errors
    ///
    /// Returns an error if the identifier is invalid or the request fails.
    #[tracing::instrument(skip(client))]
    pub async fn all_versions(client: &PdsClient, identifier: &str) -> Result<Page<Product>> {
        let path = format!("products/{}/all", identifier_segment(identifier)?);
        let data: SearchResponse = client
            .get_json(&path)
            .await
            .map_err(|e| e.or_not_found("Product", identifier))?;
        let limit = data.summary.limit.unwrap_or(DEFAULT_LIMIT);
        Ok(data.into_results(limit).page)
    }

    /// Search a product class and keep the facet buckets.
    ///
    /// # Errors
    ///
    /// Returns an error if the parameters are invalid or the request fails.
    #[tracing::instrument(skip(client))]
    pub async fn search_with_facets(
        client: &PdsClient,
        class: &ProductClass,
        params: &SearchParams,
    ) -> Result<SearchResults> {
        params.validate()?;
        let data: SearchResponse = client.get_json_with_query(&class.search_path(), params).await?;
        tracing::debug!(hits = ?data.summary.hits, returned = data.data.len(), "search complete");
        let limit = params.limit.or(data.summary.limit).unwrap_or(DEFAULT_LIMIT);
        Ok(data.into_results(limit))
    }
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Raw search response body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchResponse {
    /// Request echo and hit count.
    #[serde(default)]
    pub summary: Summary,
    /// Matching products.
    #[serde(default, deserialize_with = "null_as_default")]
    pub data: Vec<Product>,
    /// Facet buckets, when facet fields were requested.
    #[serde(default, deserialize_with = "null_as_default")]
    pub facets: Vec<Facet>,
}

impl SearchResponse {
    /// Convert to a page of products plus facets.
    pub fn into_results(self, limit: u32) -> SearchResults {
        let cursor = cursor_from_values(&self.summary.search_after);
        SearchResults {
            page: Page::new(self.data, limit, self.summary.hits, cursor),
            facets: self.facets,
        }
    }
}

/// Search summary returned alongside the data.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Summary {
    /// The query as the Registry understood it.
    #[serde(default)]
    pub q: Option<String>,
    /// Total number of matching products.
    #[serde(default)]
    pub hits: Option<u64>,
    /// Server time in milliseconds.
    #[serde(default)]
    pub took: Option<u64>,
    /// Page size applied.
    #[serde(default)]
    pub limit: Option<u32>,
    /// Sort values to request the next page with.
    #[serde(default, deserialize_with = "null_as_default")]
    pub search_after: Vec<serde_json::Value>,
    /// Sort order applied.
    #[serde(default)]
    pub sort: Option<serde_json::Value>,
    /// Properties present in the returned products.
    #[serde(default, deserialize_with = "null_as_default")]
    pub properties: Vec<String>,
}

/// Bucket counts for one faceted field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Facet {
    /// Faceted field.
    #[serde(default)]
    pub property: String,
    /// Aggregation type (e.g., "terms").
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub facet_type: Option<String>,
    /// Count per value.
    #[serde(default, deserialize_with = "null_as_default")]
    pub counts: BTreeMap<String, u64>,
}

/// A page of products with the facets computed over the whole result set.
#[derive(Debug, Clone, Serialize)]
pub struct SearchResults {
    /// The products on this page.
    #[serde(flatten)]
    pub page: Page<Product>,
    /// Facet buckets.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub facets: Vec<Facet>,
}

#[async_trait]
impl Get for Product {
    type Id = String; // LID or LIDVID

    #[tracing::instrument(skip(client))]
    async fn get(client: &PdsClient, identifier: String) -> Result<Self> {
        let path = format!("products/{}", identifier_segment(&identifier)?);

        client
            .get_json(&path)
            .await
            .map_err(|e| e.or_not_found("Product", &identifier))
    }
}

#[async_trait]
impl Search for Product {
    type Scope = ProductClass;

    async fn search_page(
        client: &PdsClient,
        scope: &Self::Scope,
        params: &SearchParams,
    ) -> Result<Page<Self>> {
        Ok(Self::search_with_facets(client, scope, params).await?.page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collection_json() -> serde_json::Value {
        serde_json::json!({
            "id": "urn:nasa:pds:cassini_iss_saturn:data_raw::1.0",
            "type": "Product_Collection",
            "title": "Cassini ISS Saturn Raw Data",
            "description": null,
            "start_date_time": "2004-02-06T02:07:06.418Z",
            "stop_date_time": "2017-09-15T10:31:35.000Z",
            "investigations": [{"id": "urn:nasa:pds:context:investigation:mission.cassini-huygens", "href": "https://pds.mcp.nasa.gov/api/search/1/products/urn:nasa:pds:context:investigation:mission.cassini-huygens"}],
            "observing_system_components": null,
            "targets": [{"id": "urn:nasa:pds:context:target:planet.saturn"}],
            "metadata": {
                "node_name": "PDS_IMG",
                "label_url": "https://pds-imaging.jpl.nasa.gov/data/cassini/collection.xml",
                "version": "1.0"
            },
            "properties": {
                "lid": ["urn:nasa:pds:cassini_iss_saturn:data_raw"],
                "vid": ["1.0"],
                "pds:Collection.pds:collection_type": ["Data"],
                "ops:Data_File_Info.ops:file_size": [1024, 2048]
            }
        })
    }

    #[test]
    fn test_product_deserialize_full() {
        let product: Product = serde_json::from_value(collection_json()).expect("deserialize");

        assert_eq!(product.product_type.as_deref(), Some("Product_Collection"));
        assert!(product.description.is_none());
        assert_eq!(product.investigations.len(), 1);
        assert!(product.observing_system_components.is_empty());
        assert_eq!(product.targets[0].id, "urn:nasa:pds:context:target:planet.saturn");
        assert_eq!(
            product.metadata.as_ref().and_then(|m| m.node_name.as_deref()),
            Some("PDS_IMG")
        );
        assert!(product.extra.is_empty());
    }

    #[test]
    fn test_product_identifiers() {
        let product: Product = serde_json::from_value(collection_json()).unwrap();
        assert_eq!(
            product.identifier(),
            Some("urn:nasa:pds:cassini_iss_saturn:data_raw::1.0")
        );
        assert_eq!(product.lid(), Some("urn:nasa:pds:cassini_iss_saturn:data_raw"));
        assert_eq!(product.version(), Some("1.0"));
    }

    #[test]
    fn test_lid_falls_back_to_lidvid() {
        let product: Product =
            serde_json::from_value(serde_json::json!({"id": "urn:nasa:pds:a:b::2.1"})).unwrap();
        assert_eq!(product.lid(), Some("urn:nasa:pds:a:b"));
        assert_eq!(product.version(), Some("2.1"));
    }

    #[test]
    fn test_key_value_format_loads() {
        let product: Product = serde_json::from_value(serde_json::json!({
            "lid": "urn:nasa:pds:context:investigation:mission.apollo_16",
            "title": "Apollo 16",
            "pds:Investigation.pds:type": "Mission"
        }))
        .unwrap();
        assert_eq!(product.identifier(), Some("urn:nasa:pds:context:investigation:mission.apollo_16"));
        assert_eq!(product.property("pds:Investigation.pds:type").as_deref(), Some("Mission"));
    }

    #[test]
    fn test_array_valued_top_level_fields() {
        let product: Product = serde_json::from_value(serde_json::json!({
            "lid": ["urn:nasa:pds:x"],
            "title": ["First", "Second"]
        }))
        .unwrap();
        assert_eq!(product.lid.as_deref(), Some("urn:nasa:pds:x"));
        assert_eq!(product.title.as_deref(), Some("First"));
    }

    #[test]
    fn test_property_accessors() {
        let product: Product = serde_json::from_value(collection_json()).unwrap();
        assert_eq!(
            product.property("pds:Collection.pds:collection_type").as_deref(),
            Some("Data")
        );
        assert_eq!(product.property("missing"), None);
        assert_eq!(
            product.property_values("ops:Data_File_Info.ops:file_size"),
            vec!["1024".to_string(), "2048".to_string()]
        );
    }

    #[test]
    fn test_property_renders_numbers() {
        let product: Product = serde_json::from_value(serde_json::json!({
            "properties": {
                "ops:Label_File_Info.ops:file_size": [4096],
                "pds:Primary_Result_Summary.pds:processing_level": ["Raw", 2]
            },
            "n": 7
        }))
        .unwrap();
        assert_eq!(
            product.property("ops:Label_File_Info.ops:file_size").as_deref(),
            Some("4096")
        );
        assert_eq!(product.property("n").as_deref(), Some("7"));
        assert!(matches!(
            product.property("pds:Primary_Result_Summary.pds:processing_level"),
            Some(Cow::Borrowed("Raw"))
        ));
    }

    #[test]
    fn test_times_parse() {
        let product: Product = serde_json::from_value(collection_json()).unwrap();
        let start = product.start_time().expect("start time");
        assert_eq!(start.format("%Y-%m-%d").to_string(), "2004-02-06");
        assert!(product.stop_time().unwrap() > start);

        let bad = Product {
            start_date_time: Some("sometime".to_string()),
            ..Default::default()
        };
        assert!(bad.start_time().is_none());
    }

    #[test]
    fn test_label_url_prefers_metadata() {
        let product: Product = serde_json::from_value(collection_json()).unwrap();
        assert_eq!(
            product.label_url(),
            Some("https://pds-imaging.jpl.nasa.gov/data/cassini/collection.xml")
        );
    }

    #[test]
    fn test_search_response_into_results() {
        let body = serde_json::json!({
            "summary": {"q": "", "hits": 25, "took": 4, "limit": 2, "search_after": ["urn:nasa:pds:b::1.0"], "properties": ["lid"]},
            "data": [{"id": "urn:nasa:pds:a::1.0"}, {"id": "urn:nasa:pds:b::1.0"}],
            "facets": [{"property": "pds:Target.pds:name", "type": "terms", "counts": {"Saturn": 20, "Titan": 5}}]
        });
        let response: SearchResponse = serde_json::from_value(body).unwrap();
        let results = response.into_results(2);

        assert_eq!(results.page.len(), 2);
        assert_eq!(results.page.total, Some(25));
        assert!(results.page.has_more);
        assert_eq!(results.page.search_after, vec!["urn:nasa:pds:b::1.0".to_string()]);
        assert_eq!(results.facets[0].counts["Saturn"], 20);
    }

    #[test]
    fn test_search_response_tolerates_nulls() {
        let response: SearchResponse =
            serde_json::from_str(r#"{"summary": {"search_after": null}, "data": null}"#).unwrap();
        let results = response.into_results(10);
        assert!(results.page.is_empty());
        assert!(!results.page.has_more);
    }

    #[test]
    fn test_search_results_serialize_flat() {
        let results = SearchResults {
            page: Page::new(vec![Product::default()], 10, Some(1), vec![]),
            facets: vec![],
        };
        let json = serde_json::to_value(&results).unwrap();
        assert_eq!(json["total"], 1);
        assert!(json.get("items").is_some());
        assert!(json.get("facets").is_none());
    }
}
