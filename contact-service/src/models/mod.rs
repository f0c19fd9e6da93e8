use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// A field that was present in the request body, possibly as `null`.
///
/// Wrapped in an `Option` on the request so that an absent key (`None`) can
/// be told apart from an explicit `null` (`Some(OptionalField::Null)`).
/// A present value of the wrong JSON type is kept as `WrongType` so it can be
/// reported against its field instead of failing the whole body.
#[derive(Debug, Clone, PartialEq)]
pub enum OptionalField<T> {
    Value(T),
    Null,
    WrongType(&'static str),
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn present_string<'de, D>(deserializer: D) -> Result<Option<OptionalField<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Some(match Value::deserialize(deserializer)? {
        Value::String(value) => OptionalField::Value(value),
        Value::Null => OptionalField::Null,
        other => OptionalField::WrongType(json_type(&other)),
    }))
}

// Request DTOs
#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ContactRequest {
    #[serde(default, deserialize_with = "present_string")]
    pub first_name: Option<OptionalField<String>>,
    #[serde(default, deserialize_with = "present_string")]
    pub last_name: Option<OptionalField<String>>,
    #[serde(default, deserialize_with = "present_string")]
    pub email: Option<OptionalField<String>>,
    #[serde(default, deserialize_with = "present_string")]
    pub phone: Option<OptionalField<String>>,
    #[serde(default, deserialize_with = "present_string")]
    pub zip: Option<OptionalField<String>>,
    #[serde(default, deserialize_with = "present_string")]
    pub support_level: Option<OptionalField<String>>,
    #[serde(default, deserialize_with = "present_string")]
    pub volunteer_level: Option<OptionalField<String>>,
    #[serde(default, deserialize_with = "present_string")]
    pub note: Option<OptionalField<String>>,
}
