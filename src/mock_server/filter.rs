//! Query expression matching for the mock registry.
//!
//! Supports the subset of the Registry query language this crate generates:
//! comparisons of the form `field like "value"` and `field eq "value"`,
//! grouped with parentheses. Comparisons that share a value are treated as
//! alternatives (`or`); distinct values must all match (`and`). Keyword
//! clauses and class/identifier filters both fit this shape.

use crate::Product;

/// Comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    /// Case-insensitive substring match; `*` is a wildcard.
    Like,
    /// Exact match.
    Eq,
}

/// One `field op "value"` comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comparison {
    pub field: String,
    pub op: Op,
    pub value: String,
}

/// A parsed query expression.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
    comparisons: Vec<Comparison>,
}

impl Filter {
    /// Parse a `q` parameter. Outer single quotes are ignored.
    pub fn parse(q: &str) -> Self {
        let q = q.trim().trim_matches('\'');
        let mut comparisons = Vec::new();
        let mut rest = q;

        while let Some(open) = rest.find('"') {
            let before = &rest[..open];
            let after = &rest[open + 1..];
            let Some(close) = after.find('"') else { break };
            let value = &after[..close];

            let mut tokens = before.split_whitespace().rev();
            let op = tokens.next().map(str::to_ascii_lowercase);
            let field = tokens.next().map(|f| f.trim_start_matches('('));

            let op = match op.as_deref() {
                Some("like") => Some(Op::Like),
                Some("eq") => Some(Op::Eq),
                _ => None,
            };
            if let (Some(op), Some(field)) = (op, field) {
                comparisons.push(Comparison {
                    field: field.to_string(),
                    op,
                    value: value.to_string(),
                });
            }

            rest = &after[close + 1..];
        }

        Self { comparisons }
    }

    /// Parsed comparisons.
    pub fn comparisons(&self) -> &[Comparison] {
        &self.comparisons
    }

    /// Whether a product satisfies every value group.
    pub fn matches(&self, product: &Product) -> bool {
        let mut values: Vec<&str> = self.comparisons.iter().map(|c| c.value.as_str()).collect();
        values.sort_unstable();
        values.dedup();

        values.iter().all(|value| {
            self.comparisons
                .iter()
                .filter(|c| c.value == *value)
                .any(|c| c.matches(product))
        })
    }
}

impl Comparison {
    fn matches(&self, product: &Product) -> bool {
        let candidates = field_values(product, &self.field);
        match self.op {
            Op::Eq => candidates.iter().any(|v| v == &self.value),
            Op::Like => {
                let needle = self.value.replace('*', "").to_lowercase();
                candidates
                    .iter()
                    .any(|v| v.to_lowercase().contains(&needle))
            }
        }
    }
}

/// Values a product holds for a queryable field.
pub fn field_values(product: &Product, field: &str) -> Vec<String> {
    let single = |v: Option<&str>| v.map(|s| vec![s.to_string()]).unwrap_or_default();
    match field {
        "id" | "lidvid" => single(product.id.as_deref()),
        "lid" => single(product.lid()),
        "title" => single(product.title.as_deref()),
        "description" => single(product.description.as_deref()),
        "product_class" => single(product.product_type.as_deref()),
        "ref_lid_investigation" => product.investigations.iter().map(|r| r.id.clone()).collect(),
        "ref_lid_target" => product.targets.iter().map(|r| r.id.clone()).collect(),
        "ref_lid_instrument" => product
            .observing_system_components
            .iter()
            .map(|r| r.id.clone())
            .collect(),
        other => product.property_values(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{all_keywords, investigation_query};

    fn product(title: &str, description: &str) -> Product {
        Product {
            id: Some("urn:nasa:pds:a::1.0".to_string()),
            title: Some(title.to_string()),
            description: Some(description.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn parses_keyword_clauses() {
        let filter = Filter::parse(&format!("'{}'", all_keywords(&["moon"]).unwrap()));
        assert_eq!(filter.comparisons().len(), 2);
        assert_eq!(filter.comparisons()[0].field, "title");
        assert_eq!(filter.comparisons()[1].op, Op::Like);
    }

    #[test]
    fn keywords_are_and_of_title_or_description() {
        let filter = Filter::parse(&all_keywords(&["saturn", "rings"]).unwrap());
        assert!(filter.matches(&product("Saturn images", "Views of the rings")));
        assert!(!filter.matches(&product("Saturn images", "Views of Titan")));
    }

    #[test]
    fn eq_and_wildcard_like() {
        let mut inv = product("Cassini-Huygens", "Mission to Saturn");
        inv.product_type = Some("Product_Context".to_string());
        inv.id = Some("urn:nasa:pds:context:investigation:mission.cassini-huygens::1.0".to_string());

        assert!(Filter::parse(&investigation_query(&["cassini"])).matches(&inv));
        assert!(!Filter::parse(&investigation_query(&["juno"])).matches(&inv));

        inv.product_type = Some("Product_Bundle".to_string());
        assert!(!Filter::parse(&investigation_query::<&str>(&[])).matches(&inv));
    }

    #[test]
    fn empty_filter_matches_everything() {
        assert!(Filter::parse("").matches(&Product::default()));
    }
}
