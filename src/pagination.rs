//! Pagination utilities for PDS Registry responses.
//!
//! The Registry pages with `search-after` cursors rather than page numbers:
//! each response carries the sort values to pass back for the next page.

use std::future::Future;

use serde::Serialize;

use crate::error::Result;
use crate::query::SearchParams;
use crate::traits::{DEFAULT_PAGE_SIZE, MAX_PAGES};

/// A page of results from the PDS Registry.
#[derive(Debug, Clone, Serialize)]
#[serde(bound = "T: Serialize")]
pub struct Page<T> {
    /// The items on this page.
    pub items: Vec<T>,
    /// Total number of hits across all pages (if known).
    pub total: Option<u64>,
    /// Requested page size.
    pub limit: u32,
    /// Cursor to pass as `search_after` for the next page.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub search_after: Vec<String>,
    /// Whether there are more pages.
    pub has_more: bool,
}

impl<T> Page<T> {
    /// Create a new page from items and pagination info.
    ///
    /// A page has more results behind it when it came back full and the
    /// total (if known) exceeds what it holds.
    #[must_use]
    pub fn new(items: Vec<T>, limit: u32, total: Option<u64>, search_after: Vec<String>) -> Self {
        let full = limit > 0 && items.len() >= limit as usize;
        let has_more = match total {
            Some(t) => full && (items.len() as u64) < t,
            None => full,
        };
        Self {
            items,
            total,
            limit,
            search_after,
            has_more,
        }
    }

    /// Map the items to a different type.
    #[must_use]
    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            limit: self.limit,
            search_after: self.search_after,
            has_more: self.has_more,
        }
    }

    /// Returns true if this page has no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the number of items on this page.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns an iterator over the items in this page.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    /// Cursor for the next page, if one can be requested.
    pub fn next_cursor(&self) -> Option<&[String]> {
        if self.has_more && !self.search_after.is_empty() {
            Some(&self.search_after)
        } else {
            None
        }
    }
}

impl<T> IntoIterator for Page<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a Page<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Fetch pages until the cursor runs out and collect every item.
///
/// Uses `params.limit` as the page size, or [`DEFAULT_PAGE_SIZE`] when unset.
/// Stops when a page has no next cursor, the cursor repeats, the collected
/// items reach the reported hits, or after [`MAX_PAGES`] pages.
pub(crate) async fn collect_all<T, F, Fut>(params: &SearchParams, mut fetch: F) -> Result<Vec<T>>
where
    F: FnMut(SearchParams) -> Fut,
    Fut: Future<Output = Result<Page<T>>>,
{
    let mut params = params.clone();
    if params.limit.is_none() {
        params.limit = Some(DEFAULT_PAGE_SIZE);
    }
    let mut all_items = Vec::new();
    let mut pages = 0;

    loop {
        let page = fetch(params.clone()).await?;
        pages += 1;

        let next = page.next_cursor().map(<[String]>::to_vec);
        let total = page.total;
        all_items.extend(page.items);

        if total.is_some_and(|t| all_items.len() as u64 >= t) {
            break;
        }

        match next {
            Some(cursor) if cursor != params.search_after => params.search_after = cursor,
            _ => break,
        }

        // Safety limit to prevent infinite loops
        if pages >= MAX_PAGES {
            tracing::warn!("Reached pagination limit of {} pages, stopping", MAX_PAGES);
            break;
        }
    }

    Ok(all_items)
}

/// Turn raw `search_after` values into cursor strings.
///
/// The Registry reports sort values with their JSON types (strings, numbers);
/// they are sent back comma-joined, so everything is rendered as text.
pub(crate) fn cursor_from_values(values: &[serde_json::Value]) -> Vec<String> {
    values
        .iter()
        .filter_map(|v| match v {
            serde_json::Value::Null => None,
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        })
        .collect()
}
