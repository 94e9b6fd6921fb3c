//! Decoding of success bodies that may or may not be wrapped in `{"data": ...}`.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Untyped JSON object, used for endpoints whose shape the server decides.
pub type JsonObject = serde_json::Map<String, Value>;

/// Decodes a success body into `T`, unwrapping the `data` envelope when present.
///
/// The body is parsed once. If it is an object with a non-null `data` member,
/// that member is decoded; otherwise the whole value is.
pub fn decode_envelope<T: DeserializeOwned>(body: &str) -> Result<T, serde_json::Error> {
    let value: Value = serde_json::from_str(body)?;
    let inner = match value {
        Value::Object(mut map) => match map.remove("data") {
            Some(data) if !data.is_null() => data,
            Some(_) | None => Value::Object(map),
        },
        other => other,
    };
    serde_json::from_value(inner)
}

/// Field deserializer that treats an explicit `null` like a missing field.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}
