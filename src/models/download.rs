//! Download links assembled from a product's file attributes.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::client::PdsClient;
use crate::error::Result;
use crate::models::{get_members_page, MembersQuery, Product};
use crate::query::{SearchParams, DEFAULT_LIMIT};
use crate::traits::Get;

const DATA_FILE_REF: &str = "ops:Data_File_Info.ops:file_ref";
const DATA_FILE_NAME: &str = "ops:Data_File_Info.ops:file_name";
const DATA_FILE_SIZE: &str = "ops:Data_File_Info.ops:file_size";
const DATA_FILE_MD5: &str = "ops:Data_File_Info.ops:md5_checksum";
const DATA_FILE_MIME: &str = "ops:Data_File_Info.ops:mime_type";
const LABEL_FILE_REF: &str = "ops:Label_File_Info.ops:file_ref";
const LABEL_FILE_NAME: &str = "ops:Label_File_Info.ops:file_name";
const LABEL_FILE_SIZE: &str = "ops:Label_File_Info.ops:file_size";
const LABEL_FILE_MD5: &str = "ops:Label_File_Info.ops:md5_checksum";

/// Fields requested when listing member products for their links.
pub const DOWNLOAD_FIELDS: &[&str] = &[
    "lid",
    "title",
    DATA_FILE_REF,
    DATA_FILE_NAME,
    DATA_FILE_SIZE,
    DATA_FILE_MD5,
    DATA_FILE_MIME,
    LABEL_FILE_REF,
    LABEL_FILE_NAME,
    LABEL_FILE_SIZE,
    LABEL_FILE_MD5,
];

/// One downloadable file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileLink {
    /// Direct URL of the file.
    pub url: String,
    /// File name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Size in bytes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    /// MD5 checksum.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub md5: Option<String>,
    /// MIME type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
}

/// The label and data files of one product.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadLinks {
    /// Product identifier.
    pub identifier: String,
    /// Product title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// The XML label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<FileLink>,
    /// Data files described by the label.
    #[serde(default)]
    pub files: Vec<FileLink>,
}

impl DownloadLinks {
    /// Collect links from a product's file attributes.
    ///
    /// The Registry reports each file attribute as a parallel array, so the
    /// n-th name, size and checksum belong to the n-th file reference.
    pub fn from_product(product: &Product) -> Self {
        let label = product
            .property(LABEL_FILE_REF)
            .map(Cow::into_owned)
            .or_else(|| product.label_url().map(str::to_string))
            .map(|url| FileLink {
                url,
                name: product.property(LABEL_FILE_NAME).map(Cow::into_owned),
                size: product.property(LABEL_FILE_SIZE).and_then(|s| s.parse().ok()),
                md5: product.property(LABEL_FILE_MD5).map(Cow::into_owned),
                mime_type: Some("application/xml".to_string()),
            });

        let names = product.property_values(DATA_FILE_NAME);
        let sizes = product.property_values(DATA_FILE_SIZE);
        let md5s = product.property_values(DATA_FILE_MD5);
        let mimes = product.property_values(DATA_FILE_MIME);

        let files = product
            .property_values(DATA_FILE_REF)
            .into_iter()
            .enumerate()
            .map(|(i, url)| FileLink {
                url,
                name: names.get(i).cloned(),
                size: sizes.get(i).and_then(|s| s.parse().ok()),
                md5: md5s.get(i).cloned(),
                mime_type: mimes.get(i).cloned(),
            })
            .collect();

        Self {
            identifier: product.identifier().unwrap_or_default().to_string(),
            title: product.title.clone(),
            label,
            files,
        }
    }

    /// Whether any file was found.
    pub fn is_empty(&self) -> bool {
        self.label.is_none() && self.files.is_empty()
    }

    /// Every URL, label first.
    pub fn urls(&self) -> impl Iterator<Item = &str> {
        self.label
            .iter()
            .chain(self.files.iter())
            .map(|f| f.url.as_str())
    }
}

/// Get download links for a product.
///
/// With `include_members`, also collects the links of the first `limit`
/// member products (e.g., the observational products of a collection).
/// The product itself always comes first.
///
/// # Errors
///
/// Returns an error if the identifier is invalid, the product is unknown or a
/// request fails.
#[tracing::instrument(skip(client))]
pub async fn get_download_links(
    client: &PdsClient,
    identifier: &str,
    include_members: bool,
    limit: Option<u32>,
) -> Result<Vec<DownloadLinks>> {
    let product = Product::get(client, identifier.to_string()).await?;
    let mut links = vec![DownloadLinks::from_product(&product)];

    if include_members {
        let params = SearchParams::default()
            .with_fields(DOWNLOAD_FIELDS.iter().copied())
            .with_limit(limit.unwrap_or(DEFAULT_LIMIT));
        let members = get_members_page(client, identifier, &MembersQuery::members(), &params).await?;
        tracing::debug!(members = members.len(), "collected member products");
        links.extend(members.iter().map(DownloadLinks::from_product));
    }

    Ok(links)
}
