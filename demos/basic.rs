//! Basic example demonstrating the PDS Registry client.
//!
//! Run with:
//! ```
//! cargo run --example basic
//! ```
//!
//! Set `PDS_API_URL` to point at another Registry deployment.

use pdsapi::{
    get_download_links, search_investigations, MembersQuery, PdsClient, Product, ProductClass,
    Search, SearchParams,
};

#[tokio::main]
async fn main() -> pdsapi::Result<()> {
    // Initialize tracing for debugging (optional)
    tracing_subscriber::fmt::init();

    // Create client from environment variables
    println!("Creating PDS client...");
    let client = PdsClient::from_env()?;
    println!("Connected to: {}", client.base_url());

    // Find missions
    println!("\n--- Searching Investigations ---");
    let missions = search_investigations(&client, &["cassini".to_string()], Some(5)).await?;
    for mission in &missions {
        println!(
            "  - {} ({})",
            mission.title.as_deref().unwrap_or("untitled"),
            mission.lid
        );
    }

    // Search collections
    println!("\n--- Searching Collections ---");
    let params = SearchParams::classes()
        .with_query(r#"((title like "saturn") or (description like "saturn"))"#)
        .with_limit(5);
    let collections = Product::search_page(&client, &ProductClass::Collection, &params).await?;
    println!(
        "Found {} collections (total: {:?})",
        collections.len(),
        collections.total
    );

    for collection in &collections {
        println!(
            "  - {} ({})",
            collection.title.as_deref().unwrap_or("untitled"),
            collection.lid().unwrap_or("?")
        );
    }

    // Walk into the first collection
    if let Some(first) = collections.items.first().and_then(|c| c.lid()) {
        println!("\n--- Listing Products of {first} ---");
        let members = pdsapi::get_members_page(
            &client,
            first,
            &MembersQuery::members(),
            &SearchParams::members().with_limit(3),
        )
        .await?;

        for product in &members {
            println!("  - {}", product.identifier().unwrap_or("?"));
        }

        if let Some(product) = members.items.first().and_then(|p| p.identifier()) {
            println!("\n--- Download Links ---");
            for links in get_download_links(&client, product, false, None).await? {
                for url in links.urls() {
                    println!("  {url}");
                }
            }
        }
    }

    println!("\nDone!");
    Ok(())
}
