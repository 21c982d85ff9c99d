//! E2E tests using the mock PDS Registry server.
//!
//! These tests exercise full workflows against the mock server,
//! testing realistic scenarios rather than individual endpoints.

#![cfg(feature = "test-server")]

use pdsapi::mcp::PdsServer;
use pdsapi::mock_server::{
    Fixtures, MockServer, MockState, BUNDLE_LID, CASSINI_LID, DATA_COLLECTION_LID,
    DOCUMENT_COLLECTION_LID,
};
use pdsapi::{
    get_download_links, get_members, get_members_page, list_classes, search_investigations, Get,
    MembersQuery, PdsClient, PdsError, Product, ProductClass, Search, SearchParams,
};

// =============================================================================
// Server Lifecycle Tests
// =============================================================================

#[tokio::test]
async fn test_server_starts_on_random_port() {
    let server1 = MockServer::start().await;
    let server2 = MockServer::start().await;

    // Both servers should have different URLs
    assert_ne!(server1.url(), server2.url());

    server1.shutdown().await;
    server2.shutdown().await;
}

#[tokio::test]
async fn test_server_shutdown_is_clean() {
    let server = MockServer::start().await;
    let url = server.url().to_string();

    server.shutdown().await;

    // After shutdown, server should not respond
    let client = reqwest::Client::new();
    let result = client.get(format!("{}/health", url)).send().await;

    assert!(result.is_err());
}

// =============================================================================
// Discovery Workflow Tests
// =============================================================================

#[tokio::test]
async fn test_search_then_walk_down_to_files() {
    let server = MockServer::start().await;
    let client = PdsClient::new(server.url()).unwrap();

    // Step 1: Find the bundle
    let params = SearchParams::classes().with_query(r#"(title like "cassini")"#);
    let bundles = Product::search_page(&client, &ProductClass::Bundle, &params)
        .await
        .expect("Failed to search bundles");
    assert_eq!(bundles.len(), 1, "old bundle versions are not searched");
    let bundle = &bundles.items[0];
    assert_eq!(bundle.lid(), Some(BUNDLE_LID));

    // Step 2: List its collections
    let collections = bundle
        .members(&client, &SearchParams::default())
        .await
        .expect("Failed to list collections");
    let lids: Vec<_> = collections.iter().filter_map(|c| c.lid()).collect();
    assert_eq!(lids, vec![DATA_COLLECTION_LID, DOCUMENT_COLLECTION_LID]);

    // Step 3: Collect download links of the data products
    let links = get_download_links(&client, DATA_COLLECTION_LID, true, Some(10))
        .await
        .expect("Failed to get links");
    assert_eq!(links.len(), 4, "collection plus three images");
    assert!(links[1..].iter().all(|l| l.label.is_some() && l.files.len() == 2));

    server.shutdown().await;
}

#[tokio::test]
async fn test_nested_members_skip_a_level() {
    let server = MockServer::start().await;
    let client = PdsClient::new(server.url()).unwrap();

    let products = get_members(
        &client,
        BUNDLE_LID,
        &MembersQuery::members().nested(true),
        &SearchParams::default(),
    )
    .await
    .expect("Failed to list nested members");

    // Three images plus the user guide
    assert_eq!(products.len(), 4);
    assert!(products
        .iter()
        .all(|p| p.product_type.as_deref() != Some("Product_Collection")));

    server.shutdown().await;
}

#[tokio::test]
async fn test_member_of_walks_up() {
    let server = MockServer::start().await;
    let client = PdsClient::new(server.url()).unwrap();

    let image = format!("{DATA_COLLECTION_LID}:n1454725799::1.0");

    let parents = get_members_page(&client, &image, &MembersQuery::member_of(), &SearchParams::default())
        .await
        .unwrap();
    assert_eq!(parents.items[0].lid(), Some(DATA_COLLECTION_LID));

    let grandparents = get_members_page(
        &client,
        &image,
        &MembersQuery::member_of().nested(true),
        &SearchParams::default(),
    )
    .await
    .unwrap();
    assert_eq!(grandparents.items[0].lid(), Some(BUNDLE_LID));

    server.shutdown().await;
}

#[tokio::test]
async fn test_cursor_pagination_across_pages() {
    let server = MockServer::start().await;
    let client = PdsClient::new(server.url()).unwrap();

    let params = SearchParams::products().with_limit(2);
    let first = Product::search_page(&client, &ProductClass::Observational, &params)
        .await
        .unwrap();
    assert_eq!(first.len(), 2);
    assert_eq!(first.total, Some(3));
    let cursor = first.next_cursor().expect("cursor").to_vec();

    let second = Product::search_page(
        &client,
        &ProductClass::Observational,
        &params.clone().with_search_after(cursor),
    )
    .await
    .unwrap();
    assert_eq!(second.len(), 1);
    assert!(!second.has_more);
    assert_ne!(first.items[1].id, second.items[0].id);

    let everything = Product::search_all(&client, &ProductClass::Observational, &params)
        .await
        .unwrap();
    assert_eq!(everything.len(), 3);

    server.shutdown().await;
}

#[tokio::test]
async fn test_facets_count_targets() {
    let server = MockServer::start().await;
    let client = PdsClient::new(server.url()).unwrap();

    let params = SearchParams::products()
        .with_limit(1)
        .with_facets(["ref_lid_target"]);
    let results = Product::search_with_facets(&client, &ProductClass::Observational, &params)
        .await
        .unwrap();

    assert_eq!(results.page.len(), 1);
    let facet = &results.facets[0];
    assert_eq!(facet.property, "ref_lid_target");
    assert_eq!(facet.counts.values().sum::<u64>(), 3);

    server.shutdown().await;
}

#[tokio::test]
async fn test_investigations_and_versions() {
    let server = MockServer::start().await;
    let client = PdsClient::new(server.url()).unwrap();

    let all = search_investigations(&client, &[], None).await.unwrap();
    assert_eq!(all.len(), 2);

    let cassini = search_investigations(&client, &["cassini".to_string()], None)
        .await
        .unwrap();
    assert_eq!(cassini.items[0].lid, CASSINI_LID);
    assert!(!cassini.items[0].is_ongoing());

    let versions = Product::all_versions(&client, BUNDLE_LID).await.unwrap();
    let ids: Vec<_> = versions.iter().filter_map(|p| p.version()).collect();
    assert_eq!(ids, vec!["1.0", "1.1"]);

    let classes = list_classes(&client).await.unwrap();
    assert!(classes.contains(&"collection".to_string()));

    server.shutdown().await;
}

// =============================================================================
// Error Handling Tests
// =============================================================================

#[tokio::test]
async fn test_unknown_product_is_not_found() {
    let server = MockServer::start().await;
    let client = PdsClient::new(server.url()).unwrap();

    let result = Product::get(&client, "urn:nasa:pds:voyager".to_string()).await;
    assert!(matches!(result, Err(PdsError::NotFound { .. })));

    let result = get_members_page(
        &client,
        "urn:nasa:pds:voyager",
        &MembersQuery::members(),
        &SearchParams::default(),
    )
    .await;
    assert!(matches!(result, Err(PdsError::NotFound { .. })));

    server.shutdown().await;
}

#[tokio::test]
async fn test_state_changes_are_visible() {
    let server = MockServer::start_empty().await;
    let client = PdsClient::new(server.url()).unwrap();

    assert!(Product::get(&client, "urn:nasa:pds:new".to_string()).await.is_err());

    {
        let state = server.state();
        let mut state = state.write().await;
        let updated = std::mem::take(&mut *state).with_product(Fixtures::product(
            "urn:nasa:pds:new::1.0",
            "New bundle",
            "Product_Bundle",
        ));
        *state = updated;
    }

    let product = Product::get(&client, "urn:nasa:pds:new".to_string())
        .await
        .unwrap();
    assert_eq!(product.title.as_deref(), Some("New bundle"));

    server.shutdown().await;
}

// =============================================================================
// MCP Workflow Tests
// =============================================================================

#[tokio::test]
async fn test_mcp_tools_against_mock_registry() {
    let server = MockServer::with_state(
        MockState::new()
            .with_product(Fixtures::product("urn:nasa:pds:b::1.0", "Moon bundle", "Product_Bundle"))
            .with_product(Fixtures::product("urn:nasa:pds:b:c::1.0", "Moon collection", "Product_Collection"))
            .with_member("urn:nasa:pds:b", "urn:nasa:pds:b:c::1.0"),
    )
    .await;
    let mcp = PdsServer::new(PdsClient::new(server.url()).unwrap());

    let result = mcp
        .dispatch("search_collections", serde_json::json!({"keywords": ["moon"]}))
        .await
        .unwrap();
    let text = match &result.content[0].raw {
        rmcp::model::RawContent::Text(t) => t.text.clone(),
        _ => panic!("Expected text content"),
    };
    assert!(text.contains("Moon collection"));
    assert!(!text.contains("Moon bundle"));

    let result = mcp
        .dispatch("list_members", serde_json::json!({"identifier": "urn:nasa:pds:b"}))
        .await
        .unwrap();
    assert!(!result.is_error.unwrap_or(false));

    server.shutdown().await;
}
