//! Product classes and the class listing endpoint.

use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::client::PdsClient;
use crate::error::{PdsError, Result};

/// Registry product class, used to scope searches.
///
/// [`ProductClass::Any`] searches every product through the `products`
/// endpoint; the others go through `classes/{class}`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ProductClass {
    /// Every product regardless of class.
    #[default]
    Any,
    /// Top-level archive units.
    Bundle,
    /// Groups of related products inside a bundle.
    Collection,
    /// Science data products.
    Observational,
    /// Documentation products.
    Document,
    /// Missions, instruments, targets and other context.
    Context,
}

impl ProductClass {
    /// All classes, in hierarchy order.
    pub const ALL: [ProductClass; 6] = [
        ProductClass::Any,
        ProductClass::Bundle,
        ProductClass::Collection,
        ProductClass::Observational,
        ProductClass::Document,
        ProductClass::Context,
    ];

    /// Class name as used in Registry paths.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductClass::Any => "any",
            ProductClass::Bundle => "bundle",
            ProductClass::Collection => "collection",
            ProductClass::Observational => "observational",
            ProductClass::Document => "document",
            ProductClass::Context => "context",
        }
    }

    /// Search endpoint for this class, relative to the API root.
    pub fn search_path(&self) -> String {
        match self {
            ProductClass::Any => "products".to_string(),
            other => format!("classes/{}", other.as_str()),
        }
    }
}

impl fmt::Display for ProductClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProductClass {
    type Err = PdsError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| PdsError::InvalidQuery(format!("unknown product class '{s}'")))
    }
}

/// List the product classes the Registry knows about.
///
/// # Errors
///
/// Returns an error if the request fails or the body is not a class list.
#[tracing::instrument(skip(client))]
pub async fn list_classes(client: &PdsClient) -> Result<Vec<String>> {
    let body: serde_json::Value = client.get_json("classes").await?;
    class_names(&body).ok_or_else(|| PdsError::ApiError {
        message: format!("unexpected class list: {body}"),
        status_code: None,
    })
}

/// Pull class names out of a `classes` response.
///
/// Accepts a bare array of names, an array of objects carrying a `name` or
/// `class` key, or an object wrapping either under `classes` / `data`.
fn class_names(body: &serde_json::Value) -> Option<Vec<String>> {
    match body {
        serde_json::Value::Array(items) => Some(
            items
                .iter()
                .filter_map(|item| match item {
                    serde_json::Value::String(s) => Some(s.clone()),
                    serde_json::Value::Object(obj) => obj
                        .get("name")
                        .or_else(|| obj.get("class"))
                        .and_then(|v| v.as_str())
                        .map(str::to_string),
                    _ => None,
                })
                .collect(),
        ),
        serde_json::Value::Object(obj) => obj
            .get("classes")
            .or_else(|| obj.get("data"))
            .and_then(class_names),
        _ => None,
    }
}
