//! PDS Registry model types.

mod class;
mod download;
mod hierarchy;
mod investigation;
mod product;

pub use class::*;
pub use download::*;
pub use hierarchy::*;
pub use investigation::*;
pub use product::*;

use serde::{Deserialize, Deserializer};

/// Treat an explicit JSON `null` like a missing field.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Accept a string, the first string of an array, or a scalar rendered as text.
///
/// Label values come back as arrays in the default JSON format and as plain
/// strings in the key-value format.
pub(crate) fn string_or_first<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(first_text))
}

/// First textual value of a JSON value.
pub(crate) fn first_text(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        serde_json::Value::Bool(b) => Some(b.to_string()),
        serde_json::Value::Array(items) => items.iter().find_map(first_text),
        _ => None,
    }
}
