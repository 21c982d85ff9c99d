//! Registry query construction.
//!
//! Maps search parameters onto the query string understood by the PDS
//! Registry (`q`, `fields`, `limit`, `sort`, `search-after`, `facet-fields`,
//! `facet-limit`) and provides helpers for the `like` / `eq` query syntax.

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde::Deserialize;

use crate::error::{PdsError, Result};

/// Default number of results per search.
pub const DEFAULT_LIMIT: u32 = 10;

/// Default number of buckets returned per facet.
pub const DEFAULT_FACET_LIMIT: u32 = 10;

/// Upper bound on `limit` accepted from MCP tool calls.
pub const MAX_LIMIT: u32 = 100;

/// Fields returned by product searches unless the caller asks otherwise.
pub const PRODUCT_FIELDS: &[&str] = &["id", "lid", "title", "description"];

/// Fields returned by bundle and collection searches unless the caller asks otherwise.
pub const CLASS_FIELDS: &[&str] = &[
    "lid",
    "title",
    "description",
    "ref_lid_instrument",
    "ref_lid_instrument_host",
    "ref_lid_investigation",
    "ref_lid_target",
];

/// Fields returned by investigation searches.
pub const INVESTIGATION_FIELDS: &[&str] = &[
    "title",
    "lid",
    "pds:Investigation.pds:start_date",
    "pds:Investigation.pds:stop_date",
    "pds:Investigation.pds:type",
    "pds:Investigation.pds:description",
];

/// Base query selecting investigation context products.
pub const INVESTIGATION_QUERY: &str =
    r#"(product_class eq "Product_Context" and lid like "urn:nasa:pds:context:investigation:*")"#;

/// Search parameters shared by every Registry search endpoint.
///
/// Serializes to the Registry's query string: list values are comma-joined,
/// empty lists and blank queries are omitted, and `q` is wrapped in exactly
/// one pair of single quotes.
///
/// # Example
///
/// ```
/// use pdsapi::SearchParams;
///
/// let params = SearchParams::products()
///     .with_query(r#"(title like "pluto")"#)
///     .with_limit(5);
/// let pairs = params.to_pairs();
/// assert!(pairs.contains(&("q", r#"'(title like "pluto")'"#.to_string())));
/// assert!(pairs.contains(&("limit", "5".to_string())));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SearchParams {
    /// Registry query expression.
    pub query: Option<String>,
    /// Fields to return.
    pub fields: Vec<String>,
    /// Maximum number of results.
    pub limit: Option<u32>,
    /// Fields to sort by (ascending).
    pub sort: Vec<String>,
    /// Sort values of the last result of the previous page.
    pub search_after: Vec<String>,
    /// Fields to aggregate into facet buckets.
    pub facet_fields: Vec<String>,
    /// Number of buckets per facet.
    pub facet_limit: Option<u32>,
}

impl SearchParams {
    /// Defaults for product searches.
    #[must_use]
    pub fn products() -> Self {
        Self {
            fields: to_strings(PRODUCT_FIELDS),
            limit: Some(DEFAULT_LIMIT),
            facet_limit: Some(DEFAULT_FACET_LIMIT),
            ..Default::default()
        }
    }

    /// Defaults for bundle and collection searches.
    #[must_use]
    pub fn classes() -> Self {
        Self {
            fields: to_strings(CLASS_FIELDS),
            limit: Some(DEFAULT_LIMIT),
            facet_limit: Some(DEFAULT_FACET_LIMIT),
            ..Default::default()
        }
    }

    /// Defaults for hierarchy listings, which take no facets.
    #[must_use]
    pub fn members() -> Self {
        Self {
            fields: to_strings(PRODUCT_FIELDS),
            limit: Some(DEFAULT_LIMIT),
            ..Default::default()
        }
    }

    /// Defaults for investigation searches.
    #[must_use]
    pub fn investigations() -> Self {
        Self {
            fields: to_strings(INVESTIGATION_FIELDS),
            limit: Some(DEFAULT_LIMIT),
            ..Default::default()
        }
    }

    /// Set the query expression.
    #[must_use]
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    /// Replace the returned fields.
    #[must_use]
    pub fn with_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Set the result limit.
    #[must_use]
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Replace the sort fields.
    #[must_use]
    pub fn with_sort<I, S>(mut self, sort: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sort = sort.into_iter().map(Into::into).collect();
        self
    }

    /// Set the pagination cursor.
    #[must_use]
    pub fn with_search_after<I, S>(mut self, cursor: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.search_after = cursor.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the facet fields.
    #[must_use]
    pub fn with_facets<I, S>(mut self, facet_fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.facet_fields = facet_fields.into_iter().map(Into::into).collect();
        self
    }

    /// Apply caller overrides on top of these defaults.
    ///
    /// Non-empty lists and present values in `overrides` win.
    #[must_use]
    pub fn merged_with(mut self, overrides: SearchParams) -> Self {
        if overrides.query.as_deref().is_some_and(|q| !q.trim().is_empty()) {
            self.query = overrides.query;
        }
        if !overrides.fields.is_empty() {
            self.fields = overrides.fields;
        }
        if overrides.limit.is_some() {
            self.limit = overrides.limit;
        }
        if !overrides.sort.is_empty() {
            self.sort = overrides.sort;
        }
        if !overrides.search_after.is_empty() {
            self.search_after = overrides.search_after;
        }
        if !overrides.facet_fields.is_empty() {
            self.facet_fields = overrides.facet_fields;
        }
        if overrides.facet_limit.is_some() {
            self.facet_limit = overrides.facet_limit;
        }
        self
    }

    /// Check values the Registry would reject.
    ///
    /// # Errors
    ///
    /// Returns [`PdsError::InvalidQuery`] when `limit` is zero.
    pub fn validate(&self) -> Result<()> {
        if self.limit == Some(0) {
            return Err(PdsError::InvalidQuery("limit must be at least 1".to_string()));
        }
        Ok(())
    }

    /// Query string pairs in Registry wire format.
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();

        if let Some(q) = self.query.as_deref().and_then(quote_query) {
            pairs.push(("q", q));
        }
        push_joined(&mut pairs, "fields", &self.fields);
        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.to_string()));
        }
        push_joined(&mut pairs, "sort", &self.sort);
        push_joined(&mut pairs, "search-after", &self.search_after);
        push_joined(&mut pairs, "facet-fields", &self.facet_fields);
        if let Some(facet_limit) = self.facet_limit {
            pairs.push(("facet-limit", facet_limit.to_string()));
        }

        pairs
    }
}

impl Serialize for SearchParams {
    fn serialize<S: Serializer>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error> {
        let pairs = self.to_pairs();
        let mut map = serializer.serialize_map(Some(pairs.len()))?;
        for (key, value) in &pairs {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

fn to_strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| (*s).to_string()).collect()
}

fn push_joined(pairs: &mut Vec<(&'static str, String)>, key: &'static str, values: &[String]) {
    let joined = values
        .iter()
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .collect::<Vec<_>>()
        .join(",");
    if !joined.is_empty() {
        pairs.push((key, joined));
    }
}

/// Wrap a query expression in a single pair of single quotes.
///
/// Quotes the caller already added are stripped first. Returns `None` for
/// blank input.
pub fn quote_query(query: &str) -> Option<String> {
    let inner = query.trim().trim_matches('\'').trim();
    if inner.is_empty() {
        None
    } else {
        Some(format!("'{inner}'"))
    }
}

/// Title-or-description match for a single search term.
///
/// Double quotes inside the term are dropped so they cannot terminate the
/// string literal early.
pub fn keyword_clause(term: &str) -> Option<String> {
    let cleaned: String = term.chars().filter(|c| *c != '"').collect();
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        return None;
    }
    Some(format!(
        r#"((title like "{cleaned}") or (description like "{cleaned}"))"#
    ))
}

/// Require every keyword to match the title or description.
pub fn all_keywords<S: AsRef<str>>(terms: &[S]) -> Option<String> {
    let clauses: Vec<String> = terms
        .iter()
        .filter_map(|t| keyword_clause(t.as_ref()))
        .collect();
    match clauses.len() {
        0 => None,
        1 => clauses.into_iter().next(),
        _ => Some(format!("({})", clauses.join(" and "))),
    }
}

/// AND a raw query with keyword clauses; either side may be absent.
pub fn combine<S: AsRef<str>>(query: Option<&str>, keywords: &[S]) -> Option<String> {
    let raw = query
        .map(|q| q.trim().trim_matches('\'').trim())
        .filter(|q| !q.is_empty());
    match (raw, all_keywords(keywords)) {
        (Some(q), Some(k)) => Some(format!("({q} and {k})")),
        (Some(q), None) => Some(q.to_string()),
        (None, Some(k)) => Some(k),
        (None, None) => None,
    }
}

/// Query for investigation context products, optionally narrowed by keywords.
///
/// Keywords are matched as one phrase.
pub fn investigation_query<S: AsRef<str>>(keywords: &[S]) -> String {
    let phrase = keywords
        .iter()
        .map(|k| k.as_ref().trim())
        .filter(|k| !k.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    match keyword_clause(&phrase) {
        Some(clause) => format!("({INVESTIGATION_QUERY} and {clause})"),
        None => INVESTIGATION_QUERY.to_string(),
    }
}

/// Validate a PDS identifier (LID or LIDVID).
///
/// # Errors
///
/// Returns [`PdsError::InvalidIdentifier`] if the identifier is blank, does not
/// start with `urn:` or contains whitespace.
pub fn validate_identifier(identifier: &str) -> Result<&str> {
    let id = identifier.trim();
    let has_scheme = id
        .get(..4)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("urn:"));
    if id.len() <= 4 || !has_scheme || id.chars().any(char::is_whitespace) {
        return Err(PdsError::InvalidIdentifier(identifier.to_string()));
    }
    Ok(id)
}

/// Validate an identifier and percent-encode it for use as a path segment.
///
/// # Errors
///
/// Returns [`PdsError::InvalidIdentifier`] if validation fails.
pub(crate) fn identifier_segment(identifier: &str) -> Result<String> {
    let id = validate_identifier(identifier)?;
    Ok(urlencoding::encode(id).into_owned())
}
