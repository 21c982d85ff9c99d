//! Mock server state management.
//!
//! Provides the in-memory product store for the mock PDS Registry.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;

use super::filter::Filter;
use crate::{Product, ProductClass};

/// Shared state for the mock server.
///
/// This struct holds all the mock data that the server will serve.
/// It's wrapped in `Arc<RwLock<_>>` for concurrent access.
#[derive(Debug, Default)]
pub struct MockState {
    /// Products indexed by LIDVID (e.g., "urn:nasa:pds:cassini_iss_saturn::1.0").
    ///
    /// Ordered, so LIDVIDs double as `search-after` sort values.
    pub products: BTreeMap<String, Product>,

    /// Member LIDVIDs indexed by the parent's LID.
    pub members: HashMap<String, Vec<String>>,
}

impl MockState {
    /// Create a new empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create state wrapped in Arc<RwLock> for sharing.
    pub fn shared(self) -> Arc<RwLock<Self>> {
        Arc::new(RwLock::new(self))
    }

    /// Add a product to the state. Products without an `id` are ignored.
    pub fn with_product(mut self, product: Product) -> Self {
        if let Some(id) = product.id.clone() {
            self.products.insert(id, product);
        }
        self
    }

    /// Register `member` (a LIDVID) as a member of `parent` (a LID or LIDVID).
    pub fn with_member(mut self, parent: &str, member: &str) -> Self {
        let parent_lid = lid_of(parent).to_string();
        self.members
            .entry(parent_lid)
            .or_default()
            .push(member.to_string());
        self
    }

    /// Resolve a LIDVID exactly, or a LID to its latest version.
    pub fn resolve(&self, identifier: &str) -> Option<&Product> {
        if identifier.contains("::") {
            return self.products.get(identifier);
        }
        self.versions(identifier).into_iter().last()
    }

    /// Every version of a LID, oldest first.
    pub fn versions(&self, identifier: &str) -> Vec<&Product> {
        let lid = lid_of(identifier);
        let mut versions: Vec<&Product> = self
            .products
            .values()
            .filter(|p| p.lid() == Some(lid))
            .collect();
        versions.sort_by_key(|p| version_key(p.version().unwrap_or_default()));
        versions
    }

    /// Latest-version products of a class that match a filter, in LIDVID order.
    pub fn search(&self, class: ProductClass, filter: &Filter) -> Vec<&Product> {
        self.products
            .values()
            .filter(|p| class == ProductClass::Any || class_of(p) == Some(class))
            .filter(|p| self.is_latest(p))
            .filter(|p| filter.matches(p))
            .collect()
    }

    /// Direct members of a product, or `None` if it is unknown.
    pub fn members_of(&self, identifier: &str) -> Option<Vec<&Product>> {
        let product = self.resolve(identifier)?;
        let lid = product.lid()?;
        let members = self
            .members
            .get(lid)
            .map(|ids| ids.iter().filter_map(|id| self.resolve(id)).collect())
            .unwrap_or_default();
        Some(members)
    }

    /// Direct parents of a product, or `None` if it is unknown.
    pub fn parents_of(&self, identifier: &str) -> Option<Vec<&Product>> {
        let product = self.resolve(identifier)?;
        let lidvid = product.id.as_deref()?;
        let lid = product.lid()?;

        let mut parents: Vec<&Product> = self
            .members
            .iter()
            .filter(|(_, ids)| ids.iter().any(|id| id == lidvid || id == lid))
            .filter_map(|(parent, _)| self.resolve(parent))
            .collect();
        parents.sort_by(|a, b| a.id.cmp(&b.id));
        Some(parents)
    }

    /// Class names, in hierarchy order.
    pub fn classes(&self) -> Vec<&'static str> {
        ProductClass::ALL
            .iter()
            .filter(|c| **c != ProductClass::Any)
            .map(ProductClass::as_str)
            .collect()
    }

    fn is_latest(&self, product: &Product) -> bool {
        match (product.lid(), product.id.as_deref()) {
            (Some(lid), Some(id)) => self.resolve(lid).and_then(|p| p.id.as_deref()) == Some(id),
            _ => true,
        }
    }
}

/// Class of a product, from its `Product_*` type.
pub fn class_of(product: &Product) -> Option<ProductClass> {
    match product.product_type.as_deref()? {
        "Product_Bundle" => Some(ProductClass::Bundle),
        "Product_Collection" => Some(ProductClass::Collection),
        "Product_Document" => Some(ProductClass::Document),
        t if t.starts_with("Product_Context") => Some(ProductClass::Context),
        t if t.starts_with("Product_Observational") => Some(ProductClass::Observational),
        _ => None,
    }
}

fn lid_of(identifier: &str) -> &str {
    identifier.split("::").next().unwrap_or(identifier)
}

// "1.10" sorts after "1.9".
fn version_key(version: &str) -> Vec<u32> {
    version
        .split('.')
        .map(|part| part.parse().unwrap_or(0))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock_server::Fixtures;

    #[test]
    fn test_resolve_lid_to_latest_version() {
        let state = MockState::new()
            .with_product(Fixtures::product("urn:nasa:pds:a::1.9", "Old", "Product_Bundle"))
            .with_product(Fixtures::product("urn:nasa:pds:a::1.10", "New", "Product_Bundle"));

        let latest = state.resolve("urn:nasa:pds:a").unwrap();
        assert_eq!(latest.title.as_deref(), Some("New"));
        assert_eq!(state.versions("urn:nasa:pds:a::1.9").len(), 2);
    }

    #[test]
    fn test_search_skips_old_versions_and_other_classes() {
        let state = MockState::new()
            .with_product(Fixtures::product("urn:nasa:pds:a::1.0", "A", "Product_Bundle"))
            .with_product(Fixtures::product("urn:nasa:pds:a::2.0", "A", "Product_Bundle"))
            .with_product(Fixtures::product("urn:nasa:pds:a:c::1.0", "C", "Product_Collection"));

        let all = state.search(ProductClass::Any, &Filter::default());
        assert_eq!(all.len(), 2);

        let bundles = state.search(ProductClass::Bundle, &Filter::default());
        assert_eq!(bundles.len(), 1);
        assert_eq!(bundles[0].id.as_deref(), Some("urn:nasa:pds:a::2.0"));
    }

    #[test]
    fn test_members_and_parents() {
        let state = MockState::new()
            .with_product(Fixtures::product("urn:nasa:pds:a::1.0", "A", "Product_Bundle"))
            .with_product(Fixtures::product("urn:nasa:pds:a:c::1.0", "C", "Product_Collection"))
            .with_member("urn:nasa:pds:a", "urn:nasa:pds:a:c::1.0");

        let members = state.members_of("urn:nasa:pds:a::1.0").unwrap();
        assert_eq!(members.len(), 1);

        let parents = state.parents_of("urn:nasa:pds:a:c").unwrap();
        assert_eq!(parents[0].title.as_deref(), Some("A"));

        assert!(state.members_of("urn:nasa:pds:missing").is_none());
    }
}
