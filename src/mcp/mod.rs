//! MCP (Model Context Protocol) server and tool types.
//!
//! This module provides an MCP server over the PDS Registry API, letting AI
//! assistants search products, walk bundles and collections, list classes and
//! collect download links.
//!
//! # Example
//!
//! ```no_run
//! use pdsapi::mcp::PdsServer;
//!
//! # #[tokio::main]
//! # async fn main() -> pdsapi::Result<()> {
//! let server = PdsServer::from_env()?;
//! server.run_stdio().await?;
//! # Ok(())
//! # }
//! ```

mod params;
mod server;

pub use params::*;
pub use server::PdsServer;
