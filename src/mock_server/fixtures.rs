//! Test data fixtures for the mock server.
//!
//! Provides factory functions for creating realistic Registry products.

use std::collections::BTreeMap;

use serde_json::{json, Value};

use crate::{Product, ProductMetadata, Reference};

/// Collection of fixture factories for test data.
pub struct Fixtures;

/// LID of the default bundle.
pub const BUNDLE_LID: &str = "urn:nasa:pds:cassini_iss_saturn";
/// LID of the default raw data collection.
pub const DATA_COLLECTION_LID: &str = "urn:nasa:pds:cassini_iss_saturn:data_raw";
/// LID of the default document collection.
pub const DOCUMENT_COLLECTION_LID: &str = "urn:nasa:pds:cassini_iss_saturn:document";
/// LID of the Cassini-Huygens investigation.
pub const CASSINI_LID: &str = "urn:nasa:pds:context:investigation:mission.cassini-huygens";
/// LID of the Juno investigation.
pub const JUNO_LID: &str = "urn:nasa:pds:context:investigation:mission.juno";
/// LID of the Saturn target.
pub const SATURN_LID: &str = "urn:nasa:pds:context:target:planet.saturn";

const ARCHIVE: &str = "https://pds-imaging.jpl.nasa.gov/data/cassini/cassini_orbiter";

impl Fixtures {
    // =========================================================================
    // Product Fixtures
    // =========================================================================

    /// Create a minimal product with identifier, title and `Product_*` type.
    pub fn product(lidvid: &str, title: &str, product_type: &str) -> Product {
        let version = lidvid.split_once("::").map(|(_, v)| v.to_string());
        Product {
            id: Some(lidvid.to_string()),
            title: Some(title.to_string()),
            product_type: Some(product_type.to_string()),
            metadata: Some(ProductMetadata {
                node_name: Some("img".to_string()),
                version,
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    /// Create an observational image product with label and data files.
    pub fn observational(lidvid: &str, title: &str, image: &str) -> Product {
        let mut product = Self::product(lidvid, title, "Product_Observational");
        product.description = Some(format!("Raw ISS narrow-angle image {image} of Saturn."));
        product.start_date_time = Some("2004-02-06T02:07:06.418Z".to_string());
        product.stop_date_time = Some("2004-02-06T02:07:07.418Z".to_string());
        product.investigations = vec![reference(CASSINI_LID)];
        product.targets = vec![reference(SATURN_LID)];
        product.properties = properties([
            ("ops:Label_File_Info.ops:file_ref", json!([format!("{ARCHIVE}/{image}.xml")])),
            ("ops:Label_File_Info.ops:file_name", json!([format!("{image}.xml")])),
            ("ops:Label_File_Info.ops:file_size", json!(["7012"])),
            (
                "ops:Data_File_Info.ops:file_ref",
                json!([format!("{ARCHIVE}/{image}.img"), format!("{ARCHIVE}/{image}.lbl")]),
            ),
            (
                "ops:Data_File_Info.ops:file_name",
                json!([format!("{image}.img"), format!("{image}.lbl")]),
            ),
            ("ops:Data_File_Info.ops:file_size", json!(["1049600", "3276"])),
            ("ops:Data_File_Info.ops:mime_type", json!(["application/octet-stream", "text/plain"])),
            ("pds:Target_Identification.pds:name", json!(["Saturn"])),
        ]);
        product
    }

    /// Create an investigation context product.
    pub fn investigation(lid: &str, title: &str, start: &str, stop: Option<&str>) -> Product {
        let mut product = Self::product(&format!("{lid}::1.0"), title, "Product_Context");
        product.description = Some(format!("The {title} mission."));

        let mut props = vec![
            ("pds:Investigation.pds:type", json!(["Mission"])),
            ("pds:Investigation.pds:start_date", json!([start])),
            ("pds:Investigation.pds:description", json!([format!("The {title} mission.")])),
        ];
        if let Some(stop) = stop {
            props.push(("pds:Investigation.pds:stop_date", json!([stop])));
        }
        product.properties = properties(props);
        product
    }

    // =========================================================================
    // Scenario Fixtures
    // =========================================================================

    /// A Cassini ISS archive: one bundle in two versions, two collections,
    /// three images, a user guide and a few context products.
    pub fn default_scenario() -> DefaultScenario {
        let mut bundle_v1 = Self::product(
            &format!("{BUNDLE_LID}::1.0"),
            "Cassini ISS Saturn Bundle",
            "Product_Bundle",
        );
        bundle_v1.description = Some("Cassini Imaging Science Subsystem observations of Saturn.".to_string());
        let mut bundle_v2 = bundle_v1.clone();
        bundle_v2.id = Some(format!("{BUNDLE_LID}::1.1"));
        if let Some(metadata) = bundle_v2.metadata.as_mut() {
            metadata.version = Some("1.1".to_string());
        }

        let mut data = Self::product(
            &format!("{DATA_COLLECTION_LID}::1.0"),
            "Cassini ISS Raw Saturn Images",
            "Product_Collection",
        );
        data.description = Some("Raw narrow-angle images of Saturn and its rings.".to_string());
        data.investigations = vec![reference(CASSINI_LID)];
        data.targets = vec![reference(SATURN_LID)];

        let mut docs = Self::product(
            &format!("{DOCUMENT_COLLECTION_LID}::1.0"),
            "Cassini ISS Documentation",
            "Product_Collection",
        );
        docs.description = Some("Instrument and archive documentation.".to_string());

        let images = ["n1454725799", "n1454726010", "n1454726221"];
        let observational: Vec<Product> = images
            .iter()
            .map(|image| {
                Self::observational(
                    &format!("{DATA_COLLECTION_LID}:{image}::1.0"),
                    &format!("ISS image {image}"),
                    image,
                )
            })
            .collect();

        let mut guide = Self::product(
            &format!("{DOCUMENT_COLLECTION_LID}:iss_user_guide::1.0"),
            "Cassini ISS User Guide",
            "Product_Document",
        );
        guide.description = Some("Guide to the ISS data archive.".to_string());

        let mut saturn = Self::product(&format!("{SATURN_LID}::1.0"), "Saturn", "Product_Context");
        saturn.description = Some("The sixth planet.".to_string());

        let mut membership = vec![
            (BUNDLE_LID.to_string(), format!("{DATA_COLLECTION_LID}::1.0")),
            (BUNDLE_LID.to_string(), format!("{DOCUMENT_COLLECTION_LID}::1.0")),
            (
                DOCUMENT_COLLECTION_LID.to_string(),
                format!("{DOCUMENT_COLLECTION_LID}:iss_user_guide::1.0"),
            ),
        ];
        membership.extend(observational.iter().filter_map(|p| {
            p.id.clone()
                .map(|id| (DATA_COLLECTION_LID.to_string(), id))
        }));

        let mut products = vec![bundle_v1, bundle_v2, data, docs, guide, saturn];
        products.extend(observational);
        products.push(Self::investigation(
            CASSINI_LID,
            "Cassini-Huygens",
            "1997-10-15",
            Some("2017-09-15"),
        ));
        products.push(Self::investigation(JUNO_LID, "Juno", "2011-08-05", None));

        DefaultScenario {
            products,
            membership,
        }
    }
}

/// Default test scenario with interconnected products.
pub struct DefaultScenario {
    pub products: Vec<Product>,
    /// (parent LID, member LIDVID) pairs.
    pub membership: Vec<(String, String)>,
}

fn reference(lid: &str) -> Reference {
    Reference {
        id: lid.to_string(),
        href: None,
    }
}

fn properties<I>(pairs: I) -> BTreeMap<String, Value>
where
    I: IntoIterator<Item = (&'static str, Value)>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
}
