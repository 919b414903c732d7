//! Canonical mapping form of records.
//!
//! Records with mismatched shapes are compared after conversion into plain
//! mappings. Absent optionals are omitted entirely, while present-but-zero
//! values (empty strings, `0`, `false`, empty sequences) are always kept.

use crate::record::Record;
use crate::value::{Mapping, Value};

/// Convert a record into a mapping keyed by external field names.
pub fn to_mapping(record: &dyn Record) -> Mapping {
    let catalog = record.catalog();
    let mut map = Mapping::new();
    for (index, field) in catalog.fields() {
        if map.contains_key(field.name()) {
            continue;
        }
        match record.get_field(index) {
            None | Some(Value::Null) => {}
            Some(value) => {
                map.insert(field.name().to_string(), normalize(&value));
            }
        }
    }
    map
}

/// Recursively replace records with their mapping form.
///
/// Sequences keep their order; timestamps and other leaves are returned
/// unchanged.
pub fn normalize(value: &Value) -> Value {
    match value {
        Value::Record(record) => Value::Map(to_mapping(record.as_ref())),
        Value::List(items) => Value::List(items.iter().map(normalize).collect()),
        Value::Map(map) => Value::Map(
            map.iter()
                .map(|(k, v)| (k.clone(), normalize(v)))
                .collect(),
        ),
        leaf => leaf.clone(),
    }
}

/// Mapping view of a composite value; null reads as the empty mapping.
pub(crate) fn as_mapping(value: &Value) -> Option<Mapping> {
    match value {
        Value::Null => Some(Mapping::new()),
        Value::Map(map) => Some(map.clone()),
        Value::Record(record) => Some(to_mapping(record.as_ref())),
        _ => None,
    }
}
