//! Total structural equality over [`Value`]s.

use crate::diff::Differ;
use crate::value::{Mapping, Value};

/// Deep equality defined for every shape.
///
/// Mappings are equal when they have the same keys and equal values,
/// sequences when they have the same length and equal elements, records when
/// their structural diff is empty. Values of different shapes are unequal;
/// numbers of different representations (`Int` vs `Float`) included.
pub fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) | (Value::Delete, Value::Delete) => true,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::Int(x), Value::Int(y)) => x == y,
        (Value::Uint(x), Value::Uint(y)) => x == y,
        (Value::Float(x), Value::Float(y)) => x == y,
        (Value::Text(x), Value::Text(y)) => x == y,
        (Value::Bytes(x), Value::Bytes(y)) => x == y,
        (Value::Timestamp(x), Value::Timestamp(y)) => x == y,
        (Value::List(x), Value::List(y)) => {
            x.len() == y.len() && x.iter().zip(y).all(|(a, b)| values_equal(a, b))
        }
        (Value::Map(x), Value::Map(y)) => mappings_equal(x, y),
        (Value::Record(x), Value::Record(y)) => Differ::default()
            .diff_records(x.as_ref(), y.as_ref())
            .is_ok_and(|patch| patch.is_empty()),
        _ => false,
    }
}

pub fn mappings_equal(a: &Mapping, b: &Mapping) -> bool {
    a.len() == b.len()
        && a.iter()
            .all(|(key, value)| b.get(key).is_some_and(|other| values_equal(value, other)))
}
