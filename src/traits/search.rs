//! Search trait for fetching collections of entities.

use async_trait::async_trait;

use crate::client::PdsClient;
use crate::error::Result;
use crate::pagination::{collect_all, Page};
use crate::query::SearchParams;

/// Default page size when walking every page of a search.
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// Maximum pages to fetch (safety limit).
pub(crate) const MAX_PAGES: u32 = 1000;

/// Search entities with `search-after` pagination.
///
/// Implement this trait for entity types that are returned by a Registry
/// search endpoint.
///
/// # Example
///
/// ```ignore
/// use pdsapi::{PdsClient, Product, ProductClass, Search, SearchParams};
///
/// let client = PdsClient::from_env()?;
///
/// // Fetch a single page
/// let params = SearchParams::classes().with_query(r#"(title like "moon")"#);
/// let page = Product::search_page(&client, &ProductClass::Collection, &params).await?;
///
/// // Fetch all pages
/// let everything = Product::search_all(&client, &ProductClass::Collection, &params).await?;
/// ```
#[async_trait]
pub trait Search: Sized + Send {
    /// Which endpoint the search runs against.
    type Scope: Default + Send + Sync;

    /// Search entities matching the parameters (single page).
    ///
    /// # Arguments
    ///
    /// * `client` - The PDS Registry client
    /// * `scope` - Endpoint selector
    /// * `params` - Query, fields and cursor
    ///
    /// # Errors
    ///
    /// Returns an error if the parameters are invalid or the request fails.
    async fn search_page(
        client: &PdsClient,
        scope: &Self::Scope,
        params: &SearchParams,
    ) -> Result<Page<Self>>;

    /// Search all entities matching the parameters (follows every cursor).
    ///
    /// Uses `params.limit` as the page size, or [`DEFAULT_PAGE_SIZE`] when
    /// unset. Stops on a missing or repeated cursor, or once every hit has
    /// been collected.
    ///
    /// # Errors
    ///
    /// Returns an error if any page request fails.
    async fn search_all(
        client: &PdsClient,
        scope: &Self::Scope,
        params: &SearchParams,
    ) -> Result<Vec<Self>> {
        collect_all(params, move |page_params| async move {
            Self::search_page(client, scope, &page_params).await
        })
        .await
    }
}
