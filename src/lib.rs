//! NASA PDS Registry client library and MCP tool server.
//!
//! A Rust library for querying the Planetary Data System (PDS) Registry API
//! using a trait-based architecture where each operation (Get, Search) is
//! defined as a trait that entity types implement. The [`mcp`] module exposes
//! the same operations as Model Context Protocol tools.
//!
//! # Quick Start
//!
//! ```no_run
//! use pdsapi::{PdsClient, Product, ProductClass, Get, Search, SearchParams};
//!
//! #[tokio::main]
//! async fn main() -> pdsapi::Result<()> {
//!     // Create client from environment variables
//!     let client = PdsClient::from_env()?;
//!
//!     // Get a product by LID
//!     let mars = Product::get(&client, "urn:nasa:pds:context:target:planet.mars".to_string()).await?;
//!     println!("Target: {:?}", mars.title);
//!
//!     // Search collections
//!     let params = SearchParams::classes().with_query(r#"(title like "seismic")"#);
//!     let page = Product::search_page(&client, &ProductClass::Collection, &params).await?;
//!     println!("Found {} of {:?} collections", page.len(), page.total);
//!
//!     // Walk down from a collection to its products
//!     let members = pdsapi::get_members_page(
//!         &client,
//!         "urn:nasa:pds:cassini_iss_saturn:data_raw::1.0",
//!         &pdsapi::MembersQuery::members(),
//!         &SearchParams::default().with_limit(5),
//!     ).await?;
//!     println!("First {} products", members.len());
//!
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! The library is organized around two core traits:
//!
//! - [`Get`] - Fetch a single product by LID or LIDVID
//! - [`Search`] - Fetch pages of products with `search-after` cursors
//!
//! Hierarchy traversal, class listing, download links and investigation
//! searches are free functions over [`PdsClient`].
//!
//! # Configuration
//!
//! The client reads configuration from environment variables:
//!
//! - `PDS_API_URL` (optional) - Base URL (defaults to `https://pds.mcp.nasa.gov/api/search/1/`)
//! - `PDS_TIMEOUT_SECS` (optional) - Request timeout in seconds (defaults to 60)

pub mod cli;
mod client;
mod error;
pub mod mcp;
#[cfg(feature = "test-server")]
pub mod mock_server;
mod models;
pub mod output;
mod pagination;
pub mod query;
mod traits;

// Re-export core types
pub use client::{PdsClient, DEFAULT_API_URL};
pub use error::{PdsError, Result};
pub use pagination::Page;
pub use query::SearchParams;

// Re-export traits
pub use traits::{Get, Search, DEFAULT_PAGE_SIZE};

// Re-export models
pub use models::{
    // Product types
    Facet,
    Product,
    ProductMetadata,
    Reference,
    SearchResponse,
    SearchResults,
    Summary,
    // Classes
    ProductClass,
    // Hierarchy
    Direction,
    MembersQuery,
    // Downloads
    DownloadLinks,
    FileLink,
    // Investigations
    Investigation,
};

// Re-export convenience functions
pub use models::{get_download_links, get_members, get_members_page};
pub use models::{list_classes, search_investigations};
