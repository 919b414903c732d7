//! Conversions between [`Value`] and `serde_json::Value`.
//!
//! JSON has no deletion marker, so patches read from JSON documents choose
//! how `null` is interpreted through [`NullPolicy`].

use serde::{Deserialize, Serialize};
use serde_json::{Map as JsonMap, Number, Value as Json};

use crate::diff::ROOT_KEY;
use crate::normalize::normalize;
use crate::value::{Mapping, Patch, Value};

/// How `null` inside a JSON patch document is read.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NullPolicy {
    /// `null` is a deletion marker.
    #[default]
    Delete,
    /// `null` is a literal null value.
    Keep,
}

impl From<Json> for Value {
    fn from(json: Json) -> Self {
        match json {
            Json::Null => Value::Null,
            Json::Bool(b) => Value::Bool(b),
            Json::Number(n) => number_to_value(&n),
            Json::String(s) => Value::Text(s),
            Json::Array(items) => Value::List(items.into_iter().map(Value::from).collect()),
            Json::Object(map) => Value::Map(map.into_iter().map(|(k, v)| (k, v.into())).collect()),
        }
    }
}

fn number_to_value(n: &Number) -> Value {
    if let Some(i) = n.as_i64() {
        Value::Int(i)
    } else if let Some(u) = n.as_u64() {
        Value::Uint(u)
    } else {
        Value::Float(n.as_f64().unwrap_or(f64::NAN))
    }
}

impl From<&Value> for Json {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null | Value::Delete => Json::Null,
            Value::Bool(b) => Json::Bool(*b),
            Value::Int(i) => Json::from(*i),
            Value::Uint(u) => Json::from(*u),
            Value::Float(x) => Number::from_f64(*x).map_or(Json::Null, Json::Number),
            Value::Text(s) => Json::String(s.clone()),
            Value::Bytes(bytes) => match std::str::from_utf8(bytes) {
                Ok(s) => Json::String(s.to_string()),
                Err(_) => Json::Array(bytes.iter().map(|b| Json::from(*b)).collect()),
            },
            Value::Timestamp(t) => Json::String(t.to_rfc3339()),
            Value::List(items) => Json::Array(items.iter().map(Json::from).collect()),
            Value::Map(map) => Json::Object(mapping_to_json(map)),
            Value::Record(_) => Json::from(&normalize(value)),
        }
    }
}

fn mapping_to_json(map: &Mapping) -> JsonMap<String, Json> {
    map.iter().map(|(k, v)| (k.clone(), Json::from(v))).collect()
}

/// Read a patch from a JSON document.
///
/// Objects become patches key by key, recursing into nested objects. Under
/// [`NullPolicy::Delete`] an object member whose value is `null` becomes a
/// [`Value::Delete`]; nulls inside arrays are always literal. A document
/// that is not an object is read as a wholesale replacement under
/// [`ROOT_KEY`].
pub fn patch_from_json(json: Json, policy: NullPolicy) -> Patch {
    match json {
        Json::Object(map) => object_to_patch(map, policy),
        other => {
            let mut patch = Patch::new();
            patch.insert(ROOT_KEY.to_string(), other.into());
            patch
        }
    }
}

fn object_to_patch(map: JsonMap<String, Json>, policy: NullPolicy) -> Patch {
    map.into_iter()
        .map(|(key, value)| {
            let value = match value {
                Json::Null if policy == NullPolicy::Delete => Value::Delete,
                Json::Object(nested) => Value::Map(object_to_patch(nested, policy)),
                other => other.into(),
            };
            (key, value)
        })
        .collect()
}
