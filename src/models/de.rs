// Lenient field decoders shared by the record types.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Render a backend id as a string: `"abc"`, `42`, or Mongo's `{"$oid": "..."}`.
pub(crate) fn id_from_value(v: &Value) -> Option<String> {
    match v {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Object(map) => map.get("$oid").and_then(id_from_value),
        _ => None,
    }
}

pub(crate) fn opaque_id<'de, D>(de: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Value::deserialize(de)?;
    Ok(id_from_value(&v).unwrap_or_default())
}

/// `null` becomes the type's default instead of a decode error.
pub(crate) fn null_as_default<'de, D, T>(de: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(de)?.unwrap_or_default())
}
