//! Investigation (mission) context products.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::client::PdsClient;
use crate::error::Result;
use crate::models::{Product, ProductClass};
use crate::pagination::Page;
use crate::query::{investigation_query, SearchParams, DEFAULT_LIMIT};

const START_DATE: &str = "pds:Investigation.pds:start_date";
const STOP_DATE: &str = "pds:Investigation.pds:stop_date";
const INVESTIGATION_TYPE: &str = "pds:Investigation.pds:type";
const DESCRIPTION: &str = "pds:Investigation.pds:description";

/// Flattened view of an investigation context product.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Investigation {
    /// Logical identifier (e.g., "urn:nasa:pds:context:investigation:mission.apollo_16").
    pub lid: String,
    /// Investigation name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Kind of investigation (e.g., "Mission", "Field Campaign").
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub investigation_type: Option<String>,
    /// Start date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    /// Stop date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_date: Option<String>,
    /// Description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Investigation {
    /// Flatten a context product into its investigation attributes.
    pub fn from_product(product: &Product) -> Self {
        Self {
            lid: product.lid().unwrap_or_default().to_string(),
            title: product.title.clone(),
            investigation_type: product
                .property(INVESTIGATION_TYPE)
                .map(Cow::into_owned),
            start_date: product.property(START_DATE).map(Cow::into_owned),
            stop_date: product.property(STOP_DATE).map(Cow::into_owned),
            description: product
                .property(DESCRIPTION)
                .map(Cow::into_owned)
                .or_else(|| product.description.clone()),
        }
    }

    /// Whether the investigation has no stop date yet.
    pub fn is_ongoing(&self) -> bool {
        self.stop_date
            .as_deref()
            .map(|d| d.trim().is_empty())
            .unwrap_or(true)
    }
}

/// Search investigation context products, optionally narrowed by keywords.
///
/// Keywords are matched together as one phrase against title and
/// description.
///
/// # Errors
///
/// Returns an error if the request fails.
#[tracing::instrument(skip(client))]
pub async fn search_investigations(
    client: &PdsClient,
    keywords: &[String],
    limit: Option<u32>,
) -> Result<Page<Investigation>> {
    let params = SearchParams::investigations()
        .with_query(investigation_query(keywords))
        .with_limit(limit.unwrap_or(DEFAULT_LIMIT));

    let results = Product::search_with_facets(client, &ProductClass::Any, &params).await?;
    Ok(results.page.map(|p| Investigation::from_product(&p)))
}
