//! Get trait for fetching single entities.

use async_trait::async_trait;

use crate::client::PdsClient;
use crate::error::Result;

/// Fetch a single entity by ID.
///
/// Implement this trait for entity types that can be fetched individually
/// by a unique identifier (a PDS LID or LIDVID).
///
/// # Example
///
/// ```ignore
/// use pdsapi::{PdsClient, Product, Get};
///
/// let client = PdsClient::from_env()?;
/// let mars = Product::get(&client, "urn:nasa:pds:context:target:planet.mars".to_string()).await?;
/// ```
#[async_trait]
pub trait Get: Sized {
    /// The ID type for this entity (e.g., a URN string).
    type Id;

    /// Fetch the entity by ID.
    ///
    /// # Arguments
    ///
    /// * `client` - The PDS Registry client
    /// * `id` - The entity identifier
    ///
    /// # Errors
    ///
    /// Returns an error if the identifier is invalid, the entity is not found
    /// or the request fails.
    async fn get(client: &PdsClient, id: Self::Id) -> Result<Self>;
}
