//! CLI argument parsing types.
//!
//! This module provides the command-line interface structure for the pdsapi binary.

use clap::{Parser, Subcommand, ValueEnum};

use crate::ProductClass;

/// NASA PDS Registry command-line interface.
#[derive(Parser, Debug)]
#[command(name = "pdsapi", about = "NASA PDS Registry CLI and MCP server", version)]
pub struct Cli {
    /// Output results as JSON instead of a table.
    #[arg(long, global = true, default_value = "false")]
    pub json: bool,

    /// Log debug output to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Registry API base URL (overrides PDS_API_URL).
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Search products, optionally within one class.
    Search {
        /// Product class to search.
        #[arg(long, value_enum, default_value = "any")]
        class: ClassArg,

        /// Registry query expression, e.g. '(title like "pluto")'.
        #[arg(long, short)]
        query: Option<String>,

        /// Keywords that must appear in the title or description.
        keywords: Vec<String>,

        /// Comma-separated fields to return.
        #[arg(long, value_delimiter = ',')]
        fields: Vec<String>,

        /// Maximum number of results.
        #[arg(long)]
        limit: Option<u32>,

        /// Comma-separated sort fields.
        #[arg(long, value_delimiter = ',')]
        sort: Vec<String>,

        /// Cursor printed by a previous search.
        #[arg(long, value_delimiter = ',')]
        search_after: Vec<String>,

        /// Comma-separated fields to facet on.
        #[arg(long, value_delimiter = ',')]
        facets: Vec<String>,
    },

    /// Search investigation (mission) context products.
    Investigations {
        /// Keywords matched as one phrase.
        keywords: Vec<String>,

        /// Maximum number of results.
        #[arg(long)]
        limit: Option<u32>,
    },

    /// Get a single product by LID or LIDVID.
    Get {
        /// The product URN.
        identifier: String,

        /// List every version instead of the latest.
        #[arg(long)]
        all_versions: bool,
    },

    /// List the members (or parents) of a bundle, collection or product.
    Members {
        /// The product URN.
        identifier: String,

        /// List parents instead of members.
        #[arg(long)]
        parents: bool,

        /// Skip one hierarchy level.
        #[arg(long)]
        nested: bool,

        /// Maximum number of results.
        #[arg(long)]
        limit: Option<u32>,

        /// Follow cursors and print every member.
        #[arg(long, conflicts_with = "limit")]
        all: bool,
    },

    /// List the Registry's product classes.
    Classes,

    /// Print the label and data file URLs of a product.
    Links {
        /// The product URN.
        identifier: String,

        /// Also list links of member products.
        #[arg(long)]
        members: bool,

        /// Maximum number of member products.
        #[arg(long)]
        limit: Option<u32>,
    },

    /// Run the MCP server on stdio.
    Serve,
}

/// Product classes accepted on the command line.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClassArg {
    /// Every product.
    Any,
    /// Bundles.
    #[value(alias = "bundles")]
    Bundle,
    /// Collections.
    #[value(alias = "collections")]
    Collection,
    /// Observational products.
    Observational,
    /// Documents.
    #[value(alias = "documents")]
    Document,
    /// Context products.
    Context,
}

impl From<ClassArg> for ProductClass {
    fn from(arg: ClassArg) -> Self {
        match arg {
            ClassArg::Any => ProductClass::Any,
            ClassArg::Bundle => ProductClass::Bundle,
            ClassArg::Collection => ProductClass::Collection,
            ClassArg::Observational => ProductClass::Observational,
            ClassArg::Document => ProductClass::Document,
            ClassArg::Context => ProductClass::Context,
        }
    }
}
