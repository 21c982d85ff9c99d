//! Mock PDS Registry server for E2E testing.
//!
//! This module provides an in-memory mock server that simulates the PDS
//! Registry API for integration and end-to-end testing. Unlike wiremock which
//! mocks at the HTTP level per-test, this server keeps a product store and
//! answers searches, hierarchy walks and cursors from it, enabling realistic
//! workflow testing.
//!
//! # Example
//!
//! ```ignore
//! use pdsapi::mock_server::MockServer;
//! use pdsapi::{PdsClient, Product, Get};
//!
//! #[tokio::test]
//! async fn test_workflow() {
//!     let server = MockServer::start().await;
//!     let client = PdsClient::new(server.url()).unwrap();
//!
//!     // Server comes with a Cassini ISS archive
//!     let bundle = Product::get(&client, "urn:nasa:pds:cassini_iss_saturn".to_string()).await.unwrap();
//!     assert_eq!(bundle.title.as_deref(), Some("Cassini ISS Saturn Bundle"));
//!
//!     server.shutdown().await;
//! }
//! ```

mod filter;
mod fixtures;
mod handlers;
mod server;
mod state;

pub use filter::Filter;
pub use fixtures::{
    DefaultScenario, Fixtures, BUNDLE_LID, CASSINI_LID, DATA_COLLECTION_LID,
    DOCUMENT_COLLECTION_LID, JUNO_LID, SATURN_LID,
};
pub use server::MockServer;
pub use state::MockState;
