//! Tests for MCP Server implementation.

use pdsapi::mcp::PdsServer;
use pdsapi::PdsClient;
use rmcp::handler::server::ServerHandler;

fn server() -> PdsServer {
    PdsServer::new(PdsClient::new("http://127.0.0.1:9/api/search/1").unwrap())
}

/// Verify PdsServer implements the traits rmcp needs.
#[test]
fn pds_server_is_handler_and_clone() {
    fn assert_server_handler<T: ServerHandler + Clone + Send + Sync + 'static>() {}
    assert_server_handler::<PdsServer>();
}

#[test]
fn get_info_returns_server_info_with_name_pdsapi() {
    let info = server().get_info();

    assert_eq!(info.server_info.name, "pdsapi");
    assert_eq!(info.server_info.version, env!("CARGO_PKG_VERSION"));
    assert!(info.capabilities.tools.is_some());

    let instructions = info.instructions.expect("instructions");
    assert!(instructions.contains("bundles contain collections"));
    assert!(instructions.contains("URN"));
}

#[test]
fn tools_cover_every_operation() {
    let names: Vec<String> = PdsServer::tools()
        .iter()
        .map(|t| t.name.to_string())
        .collect();

    for expected in [
        "search_products",
        "search_collections",
        "search_bundles",
        "search_investigations",
        "get_product",
        "list_members",
        "list_classes",
        "get_download_links",
    ] {
        assert!(names.iter().any(|n| n == expected), "missing tool {expected}");
    }
}

#[test]
fn tool_schemas_name_their_required_fields() {
    let tools = PdsServer::tools();
    let get_product = tools
        .iter()
        .find(|t| t.name == "get_product")
        .expect("get_product tool");

    let required = get_product
        .input_schema
        .get("required")
        .and_then(|r| r.as_array())
        .expect("required list");
    assert!(required.iter().any(|r| r == "identifier"));
}

#[test]
fn every_tool_has_a_description() {
    for tool in PdsServer::tools() {
        assert!(!tool.description.is_empty(), "{} has no description", tool.name);
    }
}
