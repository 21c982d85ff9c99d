//! MCP Server handler for the PDS Registry API.

use rmcp::{
    handler::server::ServerHandler,
    model::{
        CallToolRequestParam, CallToolResult, Content, ErrorData as McpError, Implementation,
        ListToolsResult, PaginatedRequestParam, ServerCapabilities, ServerInfo, Tool,
        ToolsCapability,
    },
    service::RequestContext,
    RoleServer,
};
use schemars::JsonSchema;
use serde::Serialize;
use std::sync::Arc;

use crate::{
    mcp::{
        cap_limit, DownloadLinksParams, GetProductParams, ListMembersParams, NoParams,
        SearchClassParams, SearchInvestigationsParams, SearchProductsParams,
    },
    query::DEFAULT_LIMIT,
    Get, MembersQuery, PdsClient, PdsError, Product, ProductClass, SearchParams,
};

const INSTRUCTIONS: &str = "\
NASA Planetary Data System (PDS) Registry MCP Server.

PDS4 archives are organized in three levels: bundles contain collections, and \
collections contain observational products (the labels describing the actual data). \
Context products describe investigations (missions), instruments and targets.

Query format: expressions use `like` and `eq` operators combined with `and` / `or`, \
e.g. ((title like \"pepssi\") or (description like \"pepssi\")) and ((title like \"pluto\") or (description like \"pluto\")). \
Some queries need URN identifiers taken from earlier results, e.g. \
ops:Provenance.ops:parent_collection_identifier eq \"urn:nasa:pds:cassini_iss_saturn:data_raw::1.0\".

Output rules: report the URNs of retrieved products so they can be used in follow-up \
queries, and suggest next steps for the data search.";

/// PDS Registry MCP Server.
///
/// Implements the MCP ServerHandler trait, providing tools to search and
/// browse the PDS Registry through the Model Context Protocol.
///
/// # Tools
///
/// - `search_products` - Search all products (or one class)
/// - `search_collections` / `search_bundles` - Class searches with class defaults
/// - `search_investigations` - Search mission context products
/// - `get_product` - Fetch one product by LID or LIDVID
/// - `list_members` - Walk the bundle / collection / product hierarchy
/// - `list_classes` - List the Registry's product classes
/// - `get_download_links` - Label and data file URLs of a product
///
/// # Example
///
/// ```no_run
/// use pdsapi::mcp::PdsServer;
///
/// # fn main() -> pdsapi::Result<()> {
/// let server = PdsServer::from_env()?;
/// // Server can now be used with rmcp transport
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct PdsServer {
    client: Arc<PdsClient>,
}

impl PdsServer {
    /// Create a new PdsServer from environment variables.
    ///
    /// Uses `PDS_API_URL` and `PDS_TIMEOUT_SECS` when set.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn from_env() -> crate::Result<Self> {
        let client = PdsClient::from_env()?;
        Ok(Self::new(client))
    }

    /// Create a new PdsServer with an existing client.
    pub fn new(client: PdsClient) -> Self {
        Self {
            client: Arc::new(client),
        }
    }

    /// Run the server on stdio until the peer disconnects.
    ///
    /// # Errors
    ///
    /// Returns [`PdsError::Transport`] if the transport fails.
    pub async fn run_stdio(self) -> crate::Result<()> {
        tracing::info!(base_url = %self.client.base_url(), "Starting MCP server on stdio transport");

        let transport = (tokio::io::stdin(), tokio::io::stdout());
        let server = rmcp::ServiceExt::serve(self, transport)
            .await
            .map_err(|e| PdsError::Transport(format!("Failed to start server: {e}")))?;

        let quit_reason = server
            .waiting()
            .await
            .map_err(|e| PdsError::Transport(format!("Server error: {e}")))?;

        tracing::info!("Server stopped: {:?}", quit_reason);
        Ok(())
    }

    /// Generate JSON Schema for a type.
    fn schema<T: JsonSchema>() -> Arc<serde_json::Map<String, serde_json::Value>> {
        let schema = schemars::schema_for!(T);
        let value = serde_json::to_value(&schema).unwrap_or(serde_json::json!({}));
        match value {
            serde_json::Value::Object(map) => Arc::new(map),
            _ => Arc::new(serde_json::Map::new()),
        }
    }

    /// Convert PdsError to McpError.
    fn to_mcp_error(err: PdsError) -> McpError {
        match &err {
            PdsError::NotFound { entity_type, id } => {
                McpError::resource_not_found(format!("{entity_type} '{id}' not found"), None)
            }
            PdsError::ConfigMissing(msg) | PdsError::ConfigInvalid(msg) => {
                McpError::invalid_params(msg.clone(), None)
            }
            PdsError::InvalidIdentifier(_) | PdsError::InvalidQuery(_) => {
                McpError::invalid_params(err.to_string(), None)
            }
            _ => McpError::internal_error(err.to_string(), None),
        }
    }

    /// Serialize a result as pretty-printed JSON text content.
    fn json_result<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
        let text = serde_json::to_string_pretty(value)
            .map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }

    /// Handle the `search_products` tool.
    pub async fn handle_search_products(
        &self,
        params: SearchProductsParams,
    ) -> Result<CallToolResult, McpError> {
        let class = params.class.unwrap_or_default();
        let defaults = match class {
            ProductClass::Bundle | ProductClass::Collection => SearchParams::classes(),
            _ => SearchParams::products(),
        };
        self.search(class, params.into_search(defaults)).await
    }

    /// Handle the `search_collections` and `search_bundles` tools.
    pub async fn handle_search_class(
        &self,
        class: ProductClass,
        params: SearchClassParams,
    ) -> Result<CallToolResult, McpError> {
        let search = SearchProductsParams::from(params).into_search(SearchParams::classes());
        self.search(class, search).await
    }

    async fn search(
        &self,
        class: ProductClass,
        params: SearchParams,
    ) -> Result<CallToolResult, McpError> {
        tracing::debug!(%class, ?params, "search tool call");
        let results = Product::search_with_facets(&self.client, &class, &params)
            .await
            .map_err(Self::to_mcp_error)?;
        Self::json_result(&results)
    }

    /// Handle the `search_investigations` tool.
    pub async fn handle_search_investigations(
        &self,
        params: SearchInvestigationsParams,
    ) -> Result<CallToolResult, McpError> {
        let limit = params.limit.map(cap_limit);
        let page = crate::search_investigations(&self.client, &params.keywords, limit)
            .await
            .map_err(Self::to_mcp_error)?;
        Self::json_result(&page)
    }

    /// Handle the `get_product` tool.
    ///
    /// # Errors
    ///
    /// Returns an MCP error if the identifier is not a PDS URN, the product
    /// does not exist or the underlying API call fails.
    pub async fn handle_get_product(
        &self,
        params: GetProductParams,
    ) -> Result<CallToolResult, McpError> {
        if params.all_versions {
            let versions = Product::all_versions(&self.client, &params.identifier)
                .await
                .map_err(Self::to_mcp_error)?;
            return Self::json_result(&versions);
        }

        let product = Product::get(&self.client, params.identifier)
            .await
            .map_err(Self::to_mcp_error)?;
        Self::json_result(&product)
    }

    /// Handle the `list_members` tool.
    pub async fn handle_list_members(
        &self,
        params: ListMembersParams,
    ) -> Result<CallToolResult, McpError> {
        let query = MembersQuery {
            direction: params.direction,
            nested: params.nested,
        };
        let search = SearchParams::members().merged_with(SearchParams {
            fields: params.fields,
            limit: params.limit.map(cap_limit),
            search_after: params.search_after,
            ..Default::default()
        });

        let page = crate::get_members_page(&self.client, &params.identifier, &query, &search)
            .await
            .map_err(Self::to_mcp_error)?;
        Self::json_result(&page)
    }

    /// Handle the `list_classes` tool.
    pub async fn handle_list_classes(&self) -> Result<CallToolResult, McpError> {
        let classes = crate::list_classes(&self.client)
            .await
            .map_err(Self::to_mcp_error)?;
        Self::json_result(&classes)
    }

    /// Handle the `get_download_links` tool.
    pub async fn handle_get_download_links(
        &self,
        params: DownloadLinksParams,
    ) -> Result<CallToolResult, McpError> {
        let limit = params.limit.map(cap_limit).unwrap_or(DEFAULT_LIMIT);
        let links = crate::get_download_links(
            &self.client,
            &params.identifier,
            params.include_members,
            Some(limit),
        )
        .await
        .map_err(Self::to_mcp_error)?;
        Self::json_result(&links)
    }

    /// The advertised tool set.
    pub fn tools() -> Vec<Tool> {
        vec![
            Tool::new(
                "search_products",
                "Search the latest-versioned instances of all PDS products: bundles, collections, \
                 documentation, context and observational products. Use `query` for Registry \
                 expressions and/or `keywords` for title/description matching. Paginate with \
                 `search_after` using the cursor from the previous result.",
                Self::schema::<SearchProductsParams>(),
            ),
            Tool::new(
                "search_collections",
                "Search PDS collections of observational products. Returns lid, title, \
                 description and instrument, host, investigation and target references by default.",
                Self::schema::<SearchClassParams>(),
            ),
            Tool::new(
                "search_bundles",
                "Search PDS bundles. Returns lid, title, description and instrument, host, \
                 investigation and target references by default.",
                Self::schema::<SearchClassParams>(),
            ),
            Tool::new(
                "search_investigations",
                "Search PDS context products that are investigations (missions, campaigns), \
                 optionally by keywords. Returns lid, title, type, start/stop dates and description.",
                Self::schema::<SearchInvestigationsParams>(),
            ),
            Tool::new(
                "get_product",
                "Retrieve one PDS product by URN identifier (LID or LIDVID), e.g. \
                 urn:nasa:pds:context:target:planet.mars. Set all_versions to list every version.",
                Self::schema::<GetProductParams>(),
            ),
            Tool::new(
                "list_members",
                "Walk the PDS hierarchy. direction=members lists the collections of a bundle or \
                 the products of a collection; direction=member_of lists parents. nested=true \
                 skips one level.",
                Self::schema::<ListMembersParams>(),
            ),
            Tool::new(
                "list_classes",
                "List the product classes known to the Registry (bundle, collection, \
                 observational, ...).",
                Self::schema::<NoParams>(),
            ),
            Tool::new(
                "get_download_links",
                "Get the label and data file URLs of a PDS product. With include_members, \
                 also returns links for the first `limit` member products of a collection.",
                Self::schema::<DownloadLinksParams>(),
            ),
        ]
    }

    /// Dispatch a tool call by name.
    pub async fn dispatch(
        &self,
        name: &str,
        args: serde_json::Value,
    ) -> Result<CallToolResult, McpError> {
        fn parse<T: serde::de::DeserializeOwned>(args: serde_json::Value) -> Result<T, McpError> {
            serde_json::from_value(args).map_err(|e| McpError::invalid_params(e.to_string(), None))
        }

        match name {
            "search_products" => self.handle_search_products(parse(args)?).await,
            "search_collections" => {
                self.handle_search_class(ProductClass::Collection, parse(args)?)
                    .await
            }
            "search_bundles" => {
                self.handle_search_class(ProductClass::Bundle, parse(args)?)
                    .await
            }
            "search_investigations" => self.handle_search_investigations(parse(args)?).await,
            "get_product" => self.handle_get_product(parse(args)?).await,
            "list_members" => self.handle_list_members(parse(args)?).await,
            "list_classes" => self.handle_list_classes().await,
            "get_download_links" => self.handle_get_download_links(parse(args)?).await,
            other => Err(McpError::invalid_params(
                format!("Unknown tool: {other}"),
                None,
            )),
        }
    }
}

impl ServerHandler for PdsServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: Default::default(),
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability {
                    list_changed: Some(false),
                }),
                ..Default::default()
            },
            server_info: Implementation {
                name: "pdsapi".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            instructions: Some(INSTRUCTIONS.to_string()),
        }
    }

    async fn list_tools(
        &self,
        _request: PaginatedRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        Ok(ListToolsResult {
            tools: Self::tools(),
            next_cursor: None,
        })
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        let args = request
            .arguments
            .map(serde_json::Value::Object)
            .unwrap_or(serde_json::json!({}));

        tracing::info!(tool = %request.name, "tool call");
        self.dispatch(request.name.as_ref(), args).await
    }
}
