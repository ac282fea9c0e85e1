//! Conversions between typed models and schemaless store items.

use entity_store::Attributes;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde::ser::Error as _;

use crate::error::Result;

/// Serializes a model into a store attribute map.
pub(crate) fn to_item<T: Serialize>(value: &T) -> Result<Attributes> {
    match serde_json::to_value(value)? {
        serde_json::Value::Object(map) => Ok(map),
        other => Err(serde_json::Error::custom(format!("expected a JSON object, got {other}")).into()),
    }
}

/// Deserializes a store attribute map back into a model.
pub(crate) fn from_item<T: DeserializeOwned>(item: Attributes) -> Result<T> {
    Ok(serde_json::from_value(serde_json::Value::Object(item))?)
}
