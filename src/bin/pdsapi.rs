//! NASA PDS Registry CLI binary.
//!
//! A command-line interface for the PDS Registry API, which can also run
//! as an MCP server on stdio.

use clap::Parser;
use pdsapi::cli::{Cli, Command};
use pdsapi::mcp::PdsServer;
use pdsapi::output::PrettyPrint;
use pdsapi::query::combine;
use pdsapi::{
    get_download_links, get_members, get_members_page, list_classes, search_investigations, Get,
    MembersQuery, Page, PdsClient, Product, ProductClass, SearchParams,
};
use serde::Serialize;
use std::process::ExitCode;
use tabled::{Table, Tabled};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose, matches!(cli.command, Command::Serve));

    let client = match PdsClient::from_env_with_url(cli.api_url.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!("Hint: Check PDS_API_URL and PDS_TIMEOUT_SECS");
            return ExitCode::FAILURE;
        }
    };

    match run(client, cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

// Logs go to stderr; stdout carries results or the MCP transport.
fn init_tracing(verbose: bool, serving: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        let default = if serving { "info" } else { "warn" };
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(client: PdsClient, cli: Cli) -> pdsapi::Result<()> {
    let json = cli.json;
    match cli.command {
        Command::Search {
            class,
            query,
            keywords,
            fields,
            limit,
            sort,
            search_after,
            facets,
        } => {
            let class = ProductClass::from(class);
            let defaults = match class {
                ProductClass::Bundle | ProductClass::Collection => SearchParams::classes(),
                _ => SearchParams::products(),
            };
            let params = defaults.merged_with(SearchParams {
                query: combine(query.as_deref(), &keywords),
                fields,
                limit,
                sort,
                search_after,
                facet_fields: facets,
                facet_limit: None,
            });

            let results = Product::search_with_facets(&client, &class, &params).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&results)?);
            } else {
                output_page(&results.page, |p| ProductRow::from(p));
                for facet in &results.facets {
                    println!("\nFacet {}:", facet.property);
                    for (value, count) in &facet.counts {
                        println!("  {value}: {count}");
                    }
                }
            }
        }
        Command::Investigations { keywords, limit } => {
            let page = search_investigations(&client, &keywords, limit).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&page)?);
            } else if let [only] = page.items.as_slice() {
                // A single match gets the detail view
                println!("{}", only.pretty_print());
            } else {
                output_page(&page, |i| InvestigationRow::from(i));
            }
        }
        Command::Get {
            identifier,
            all_versions,
        } => {
            if all_versions {
                let versions = Product::all_versions(&client, &identifier).await?;
                if json {
                    println!("{}", serde_json::to_string_pretty(&versions)?);
                } else {
                    output_page(&versions, |p| ProductRow::from(p));
                }
            } else {
                let product = Product::get(&client, identifier).await?;
                output_single(&product, json)?;
            }
        }
        Command::Members {
            identifier,
            parents,
            nested,
            limit,
            all,
        } => {
            let query = if parents {
                MembersQuery::member_of()
            } else {
                MembersQuery::members()
            }
            .nested(nested);

            if all {
                // Page size falls back to the full-walk default
                let params = SearchParams {
                    limit: None,
                    ..SearchParams::members()
                };
                let products = get_members(&client, &identifier, &query, &params).await?;
                if json {
                    println!("{}", serde_json::to_string_pretty(&products)?);
                } else {
                    let rows: Vec<ProductRow> =
                        products.iter().map(|p| ProductRow::from(p)).collect();
                    println!("{}", Table::new(rows));
                    println!("\n{} products", products.len());
                }
            } else {
                let mut params = SearchParams::members();
                if let Some(limit) = limit {
                    params.limit = Some(limit);
                }
                let page = get_members_page(&client, &identifier, &query, &params).await?;
                if json {
                    println!("{}", serde_json::to_string_pretty(&page)?);
                } else {
                    output_page(&page, |p| ProductRow::from(p));
                }
            }
        }
        Command::Classes => {
            let classes = list_classes(&client).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&classes)?);
            } else {
                for class in classes {
                    println!("{class}");
                }
            }
        }
        Command::Links {
            identifier,
            members,
            limit,
        } => {
            let links = get_download_links(&client, &identifier, members, limit).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&links)?);
            } else {
                let blocks: Vec<String> = links.iter().map(|l| l.pretty_print()).collect();
                println!("{}", blocks.join("\n\n"));
            }
        }
        Command::Serve => {
            PdsServer::new(client).run_stdio().await?;
        }
    }
    Ok(())
}

fn output_single<T: Serialize + PrettyPrint>(item: &T, json: bool) -> pdsapi::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(item)?);
    } else {
        println!("{}", item.pretty_print());
    }
    Ok(())
}

fn output_page<T, R, F>(page: &Page<T>, to_row: F)
where
    R: Tabled,
    F: Fn(&T) -> R,
{
    let rows: Vec<R> = page.items.iter().map(to_row).collect();
    println!("{}", Table::new(rows));

    let shown = page.len();
    match page.total {
        Some(total) => println!("\n{shown} of {total} results"),
        None => println!("\n{shown} results"),
    }
    if let Some(cursor) = page.next_cursor() {
        println!("More available: --search-after {}", cursor.join(","));
    }
}

// Table row types for non-JSON output

#[derive(Tabled)]
struct ProductRow {
    identifier: String,
    title: String,
}

impl From<&Product> for ProductRow {
    fn from(p: &Product) -> Self {
        Self {
            identifier: p.identifier().unwrap_or_default().to_string(),
            title: p.title.clone().unwrap_or_default(),
        }
    }
}

#[derive(Tabled)]
struct InvestigationRow {
    lid: String,
    title: String,
    #[tabled(rename = "type")]
    investigation_type: String,
    start: String,
    stop: String,
}

impl From<&pdsapi::Investigation> for InvestigationRow {
    fn from(i: &pdsapi::Investigation) -> Self {
        Self {
            lid: i.lid.clone(),
            title: i.title.clone().unwrap_or_default(),
            investigation_type: i.investigation_type.clone().unwrap_or_default(),
            start: i.start_date.clone().unwrap_or_default(),
            stop: i.stop_date.clone().unwrap_or_default(),
        }
    }
}
