//! Conversions between typed record slots and dynamic [`Value`]s.
//!
//! Inbound conversion is lenient where the value's meaning is unambiguous:
//! any numeric converts to any numeric (lossy, never failing), strings parse
//! into numbers, booleans and timestamps, and bytes become text. Outbound
//! conversion is always exact.

use std::collections::{BTreeMap, HashMap};
use std::fmt::Display;
use std::hash::Hash;
use std::str::FromStr;

use chrono::{DateTime, Utc};

use crate::catalog::FieldKind;
use crate::error::CoerceError;
use crate::value::{Mapping, Value};

/// A type that can occupy a record slot.
pub trait FieldValue: Sized {
    /// How the engines treat the slot.
    const KIND: FieldKind;

    /// Whether the slot can hold null.
    const NULLABLE: bool = false;

    fn to_value(&self) -> Value;

    fn from_value(value: Value) -> Result<Self, CoerceError>;
}

/// Reject null and delete markers, the two shapes only nullable slots accept.
fn reject_null(value: &Value) -> Result<(), CoerceError> {
    match value {
        Value::Null | Value::Delete => Err(CoerceError::Null),
        _ => Ok(()),
    }
}

impl FieldValue for bool {
    const KIND: FieldKind = FieldKind::Leaf;

    fn to_value(&self) -> Value {
        Value::Bool(*self)
    }

    fn from_value(value: Value) -> Result<Self, CoerceError> {
        reject_null(&value)?;
        match value {
            Value::Bool(b) => Ok(b),
            Value::Text(s) => parse_bool(&s),
            other => Err(CoerceError::mismatch("bool", &other)),
        }
    }
}

/// The spellings accepted for a boolean held as text.
fn parse_bool(s: &str) -> Result<bool, CoerceError> {
    match s {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(false),
        _ => Err(CoerceError::Parse {
            input: s.to_string(),
            expected: "bool",
            reason: "expected one of 1, t, true, 0, f, false".to_string(),
        }),
    }
}

macro_rules! numeric_field {
    ($variant:ident as $wide:ty => $($ty:ty),*) => {$(
        impl FieldValue for $ty {
            const KIND: FieldKind = FieldKind::Leaf;

            fn to_value(&self) -> Value {
                Value::$variant(*self as $wide)
            }

            #[allow(
                clippy::cast_possible_truncation,
                clippy::cast_sign_loss,
                clippy::cast_precision_loss
            )]
            fn from_value(value: Value) -> Result<Self, CoerceError> {
                reject_null(&value)?;
                match value {
                    Value::Int(n) => Ok(n as $ty),
                    Value::Uint(n) => Ok(n as $ty),
                    Value::Float(x) => Ok(x as $ty),
                    Value::Text(s) => s.parse::<$ty>().map_err(|e| CoerceError::Parse {
                        input: s.clone(),
                        expected: stringify!($ty),
                        reason: e.to_string(),
                    }),
                    other => Err(CoerceError::mismatch(stringify!($ty), &other)),
                }
            }
        }
    )*};
}

numeric_field!(Int as i64 => i8, i16, i32, i64, isize);
numeric_field!(Uint as u64 => u8, u16, u32, u64, usize);
numeric_field!(Float as f64 => f32, f64);

impl FieldValue for String {
    const KIND: FieldKind = FieldKind::Leaf;

    fn to_value(&self) -> Value {
        Value::Text(self.clone())
    }

    fn from_value(value: Value) -> Result<Self, CoerceError> {
        reject_null(&value)?;
        match value {
            Value::Text(s) => Ok(s),
            Value::Bytes(bytes) => Ok(String::from_utf8_lossy(&bytes).into_owned()),
            other => Err(CoerceError::mismatch("string", &other)),
        }
    }
}

impl FieldValue for DateTime<Utc> {
    const KIND: FieldKind = FieldKind::Timestamp;

    fn to_value(&self) -> Value {
        Value::Timestamp(*self)
    }

    fn from_value(value: Value) -> Result<Self, CoerceError> {
        reject_null(&value)?;
        match value {
            Value::Timestamp(t) => Ok(t),
            Value::Text(s) => DateTime::parse_from_rfc3339(&s)
                .map(|t| t.with_timezone(&Utc))
                .map_err(|source| CoerceError::Time { input: s, source }),
            other => Err(CoerceError::mismatch("timestamp", &other)),
        }
    }
}

/// A dynamic slot accepts any value as-is.
impl FieldValue for Value {
    const KIND: FieldKind = FieldKind::Dynamic;
    const NULLABLE: bool = true;

    fn to_value(&self) -> Value {
        self.clone()
    }

    fn from_value(value: Value) -> Result<Self, CoerceError> {
        match value {
            Value::Delete => Ok(Value::Null),
            other => Ok(other),
        }
    }
}

impl<T: FieldValue> FieldValue for Option<T> {
    const KIND: FieldKind = T::KIND;
    const NULLABLE: bool = true;

    fn to_value(&self) -> Value {
        self.as_ref().map_or(Value::Null, FieldValue::to_value)
    }

    fn from_value(value: Value) -> Result<Self, CoerceError> {
        match value {
            Value::Null | Value::Delete => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}

impl<T: FieldValue> FieldValue for Box<T> {
    const KIND: FieldKind = T::KIND;
    const NULLABLE: bool = T::NULLABLE;

    fn to_value(&self) -> Value {
        (**self).to_value()
    }

    fn from_value(value: Value) -> Result<Self, CoerceError> {
        T::from_value(value).map(Box::new)
    }
}

impl<T: FieldValue> FieldValue for Vec<T> {
    const KIND: FieldKind = FieldKind::Sequence;

    fn to_value(&self) -> Value {
        Value::List(self.iter().map(FieldValue::to_value).collect())
    }

    fn from_value(value: Value) -> Result<Self, CoerceError> {
        reject_null(&value)?;
        match value {
            Value::List(items) => items.into_iter().map(T::from_value).collect(),
            other => Err(CoerceError::mismatch("list", &other)),
        }
    }
}

const fn map_kind(value_kind: FieldKind) -> FieldKind {
    if matches!(value_kind, FieldKind::Dynamic) {
        FieldKind::DynamicMap
    } else {
        FieldKind::UniformMap
    }
}

/// Convert a mapping into typed entries, dropping delete markers.
fn map_entries<K, V>(
    value: Value,
) -> Result<impl Iterator<Item = Result<(K, V), CoerceError>>, CoerceError>
where
    K: FromStr,
    K::Err: Display,
    V: FieldValue,
{
    reject_null(&value)?;
    let map = match value {
        Value::Map(map) => map,
        other => return Err(CoerceError::mismatch("mapping", &other)),
    };
    Ok(map
        .into_iter()
        .filter(|(_, v)| !v.is_delete())
        .map(|(k, v)| {
            let key = k.parse::<K>().map_err(|e| CoerceError::Parse {
                reason: e.to_string(),
                input: k,
                expected: "map key",
            })?;
            Ok((key, V::from_value(v)?))
        }))
}

impl<K, V> FieldValue for BTreeMap<K, V>
where
    K: Ord + Display + FromStr,
    K::Err: Display,
    V: FieldValue,
{
    const KIND: FieldKind = map_kind(V::KIND);

    fn to_value(&self) -> Value {
        Value::Map(
            self.iter()
                .map(|(k, v)| (k.to_string(), v.to_value()))
                .collect::<Mapping>(),
        )
    }

    fn from_value(value: Value) -> Result<Self, CoerceError> {
        map_entries(value)?.collect()
    }
}

impl<K, V> FieldValue for HashMap<K, V>
where
    K: Eq + Hash + Display + FromStr,
    K::Err: Display,
    V: FieldValue,
{
    const KIND: FieldKind = map_kind(V::KIND);

    fn to_value(&self) -> Value {
        Value::Map(
            self.iter()
                .map(|(k, v)| (k.to_string(), v.to_value()))
                .collect::<Mapping>(),
        )
    }

    fn from_value(value: Value) -> Result<Self, CoerceError> {
        map_entries(value)?.collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn numerics_convert_across_widths() {
        assert_eq!(i32::from_value(Value::Float(42.9)).unwrap(), 42);
        assert_eq!(f64::from_value(Value::Int(95)).unwrap(), 95.0);
        assert_eq!(u8::from_value(Value::Int(300)).unwrap(), 44);
        assert_eq!(i64::from_value(Value::Uint(7)).unwrap(), 7);
    }

    #[test]
    fn strings_parse_into_numbers_and_bools() {
        assert_eq!(i32::from_value(Value::from("42")).unwrap(), 42);
        assert_eq!(f64::from_value(Value::from("95.5")).unwrap(), 95.5);
        assert!(bool::from_value(Value::from("true")).unwrap());

        let err = i32::from_value(Value::from("not-a-number")).unwrap_err();
        assert!(err.to_string().contains("cannot convert string"));
    }

    #[test]
    fn bools_parse_from_common_spellings() {
        for s in ["1", "t", "T", "TRUE", "true", "True"] {
            assert!(bool::from_value(Value::from(s)).unwrap(), "{s}");
        }
        for s in ["0", "f", "F", "FALSE", "false", "False"] {
            assert!(!bool::from_value(Value::from(s)).unwrap(), "{s}");
        }
        for s in ["yes", "tRuE", "", " true", "2"] {
            let err = bool::from_value(Value::from(s)).unwrap_err();
            assert!(matches!(err, CoerceError::Parse { expected: "bool", .. }), "{s}");
        }
    }

    #[test]
    fn bytes_become_text() {
        let s = String::from_value(Value::from(&b"ByteString"[..])).unwrap();
        assert_eq!(s, "ByteString");
    }

    #[test]
    fn no_outbound_string_conversion() {
        assert!(String::from_value(Value::Int(3)).is_err());
    }

    #[test]
    fn timestamps_from_rfc3339() {
        let expected = Utc.with_ymd_and_hms(2023, 12, 25, 10, 30, 0).unwrap();
        let parsed = DateTime::<Utc>::from_value(Value::from("2023-12-25T10:30:00Z")).unwrap();
        assert_eq!(parsed, expected);

        let err = DateTime::<Utc>::from_value(Value::from("invalid-time")).unwrap_err();
        assert!(err.to_string().contains("cannot parse time string"));
    }

    #[test]
    fn null_only_fits_nullable_slots() {
        assert!(matches!(String::from_value(Value::Null), Err(CoerceError::Null)));
        assert!(matches!(i32::from_value(Value::Delete), Err(CoerceError::Null)));
        assert_eq!(Option::<i32>::from_value(Value::Null).unwrap(), None);
        assert_eq!(Option::<i32>::from_value(Value::Int(5)).unwrap(), Some(5));
    }

    #[test]
    fn map_kinds() {
        assert_eq!(<BTreeMap<String, Value>>::KIND, FieldKind::DynamicMap);
        assert_eq!(<HashMap<String, String>>::KIND, FieldKind::UniformMap);
        assert_eq!(<Option<Vec<String>>>::KIND, FieldKind::Sequence);
        assert!(<Option<Vec<String>>>::NULLABLE);
    }

    #[test]
    fn map_keys_are_string_coerced() {
        let mut scores = HashMap::new();
        scores.insert(7u32, 1.5f64);
        let value = scores.to_value();
        assert_eq!(value.as_map().unwrap()["7"], Value::Float(1.5));

        let back = HashMap::<u32, f64>::from_value(value).unwrap();
        assert_eq!(back, scores);
    }

    #[test]
    fn uniform_map_drops_delete_markers() {
        let mut patch = Mapping::new();
        patch.insert("key1".into(), Value::from("v1"));
        patch.insert("key2".into(), Value::Delete);
        let map = BTreeMap::<String, String>::from_value(Value::Map(patch)).unwrap();
        assert_eq!(map.len(), 1);
        assert_eq!(map["key1"], "v1");
    }
}
