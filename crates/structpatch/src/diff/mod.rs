//! Diff engine: compute the minimal patch between two values.
//!
//! Dispatch is type-directed:
//!
//! 1. both null: empty patch
//! 2. records of one type: field-by-field ([`Differ::diff_records`])
//! 3. two mappings: key-by-key ([`Differ::diff_mappings`])
//! 4. any other pairing of records, mappings and null: both sides are
//!    normalized into mappings, then diffed key-by-key
//! 5. leaves: equal gives an empty patch, otherwise the new value is
//!    returned whole under the empty-string key
//!
//! Applying the resulting patch to `old` reproduces `new`.

pub mod changes;
pub mod mapping;
pub mod record;

use tracing::debug;

pub use changes::{ChangeSet, Change};

use crate::config::DiffConfig;
use crate::equal::values_equal;
use crate::error::{PatchError, PatchResult};
use crate::normalize::as_mapping;
use crate::record::Record;
use crate::value::{Mapping, Patch, Value};

/// Key under which a wholesale leaf replacement is reported.
pub const ROOT_KEY: &str = "";

/// A diff engine bound to a [`DiffConfig`].
#[derive(Clone, Debug, Default)]
pub struct Differ {
    config: DiffConfig,
}

impl Differ {
    pub fn new(config: DiffConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DiffConfig {
        &self.config
    }

    /// Diff two values of any shape.
    pub fn diff(&self, old: &Value, new: &Value) -> PatchResult<Patch> {
        self.diff_at(old, new, 0)
    }

    /// Diff two records. Records of different types are compared through
    /// their mapping form.
    pub fn diff_records(&self, old: &dyn Record, new: &dyn Record) -> PatchResult<Patch> {
        self.records_at(old, new, 0)
    }

    /// Diff two mappings.
    pub fn diff_mappings(&self, old: &Mapping, new: &Mapping) -> PatchResult<Patch> {
        self.mappings_at(old, new, 0)
    }

    pub(crate) fn diff_at(&self, old: &Value, new: &Value, depth: usize) -> PatchResult<Patch> {
        if depth > self.config.max_depth {
            return Err(PatchError::DepthExceeded {
                limit: self.config.max_depth,
            });
        }

        match (old, new) {
            (Value::Null, Value::Null) => Ok(Patch::new()),
            (Value::Record(a), Value::Record(b)) if a.same_type(b.as_ref()) => {
                self.records_at(a.as_ref(), b.as_ref(), depth)
            }
            (Value::Map(a), Value::Map(b)) => self.mappings_at(a, b, depth),
            _ => match (as_mapping(old), as_mapping(new)) {
                (Some(a), Some(b)) => {
                    debug!(
                        old = old.kind_name(),
                        new = new.kind_name(),
                        "shape mismatch, diffing as mappings"
                    );
                    self.mappings_at(&a, &b, depth)
                }
                _ => Ok(leaf_patch(old, new)),
            },
        }
    }
}

fn leaf_patch(old: &Value, new: &Value) -> Patch {
    let mut patch = Patch::new();
    if !values_equal(old, new) {
        patch.insert(ROOT_KEY.to_string(), new.clone());
    }
    patch
}

/// Diff two values of any shape with the default configuration.
pub fn diff(old: &Value, new: &Value) -> PatchResult<Patch> {
    Differ::default().diff(old, new)
}

/// Diff two records with the default configuration.
pub fn diff_records(old: &dyn Record, new: &dyn Record) -> PatchResult<Patch> {
    Differ::default().diff_records(old, new)
}

/// Diff two mappings with the default configuration.
pub fn diff_mappings(old: &Mapping, new: &Mapping) -> PatchResult<Patch> {
    Differ::default().diff_mappings(old, new)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[derive(Debug, Clone, Default, crate::Record)]
    struct User {
        pub name: String,
        pub age: i32,
        pub email: String,
    }

    #[derive(Debug, Clone, Default, crate::Record)]
    struct Address {
        pub street: String,
        pub city: String,
        pub zip: String,
    }

    fn user() -> User {
        User {
            name: "John".into(),
            age: 30,
            email: "john@example.com".into(),
        }
    }

    #[test]
    fn both_null() {
        assert!(diff(&Value::Null, &Value::Null).unwrap().is_empty());
    }

    #[test]
    fn record_to_record() {
        let new = User {
            name: "Jane".into(),
            ..user()
        };
        let patch = diff(&Value::record(user()), &Value::record(new)).unwrap();
        assert_eq!(Value::Map(patch), Value::from(json!({"name": "Jane"})));
    }

    #[test]
    fn record_to_mapping_and_back() {
        let as_map = Value::from(json!({"name": "Jane", "age": 30}));

        let patch = diff(&Value::record(user()), &as_map).unwrap();
        assert_eq!(patch["name"], Value::from("Jane"));
        assert!(patch["email"].is_delete());
        assert!(!patch.contains_key("age"));

        let patch = diff(&as_map, &Value::record(user())).unwrap();
        assert_eq!(patch["name"], Value::from("John"));
        assert_eq!(patch["email"], Value::from("john@example.com"));
        assert_eq!(patch.len(), 2);
    }

    #[test]
    fn different_record_types() {
        let address = Address {
            street: "123 Main St".into(),
            city: "NYC".into(),
            zip: "10001".into(),
        };
        let patch = diff(&Value::record(user()), &Value::record(address)).unwrap();

        for key in ["name", "age", "email"] {
            assert!(patch[key].is_delete(), "{key} should be deleted");
        }
        assert_eq!(patch["street"], Value::from("123 Main St"));
        assert_eq!(patch["city"], Value::from("NYC"));
        assert_eq!(patch["zip"], Value::from("10001"));
        assert_eq!(patch.len(), 6);
    }

    #[test]
    fn null_against_record() {
        let patch = diff(&Value::Null, &Value::record(user())).unwrap();
        assert_eq!(
            Value::Map(patch),
            Value::from(json!({"name": "John", "age": 30, "email": "john@example.com"}))
        );

        let patch = diff(&Value::record(user()), &Value::Null).unwrap();
        assert_eq!(patch.len(), 3);
        assert!(patch.values().all(Value::is_delete));
    }

    #[test]
    fn null_against_mapping() {
        let new = Value::from(json!({"name": "John"}));
        let patch = diff(&Value::Null, &new).unwrap();
        assert_eq!(Value::Map(patch), new);
    }

    #[test]
    fn leaves() {
        let patch = diff(&Value::from("hello"), &Value::from("world")).unwrap();
        assert_eq!(patch.len(), 1);
        assert_eq!(patch[ROOT_KEY], Value::from("world"));

        assert!(diff(&Value::from("hello"), &Value::from("hello")).unwrap().is_empty());
        assert_eq!(
            diff(&Value::from(vec![1, 2]), &Value::from(vec![1, 3])).unwrap()[ROOT_KEY],
            Value::from(vec![1, 3])
        );
    }

    #[test]
    fn composite_against_leaf_replaces_wholesale() {
        let patch = diff(&Value::from(json!({"a": 1})), &Value::Int(5)).unwrap();
        assert_eq!(patch[ROOT_KEY], Value::Int(5));
    }

    #[test]
    fn depth_limit() {
        let deep = json!({"a": {"b": {"c": {"d": 1}}}});
        let deeper = json!({"a": {"b": {"c": {"d": 2}}}});
        let differ = Differ::new(DiffConfig::with_max_depth(2));

        let err = differ
            .diff(&Value::from(deep.clone()), &Value::from(deeper.clone()))
            .unwrap_err();
        assert!(matches!(err, PatchError::DepthExceeded { limit: 2 }));

        let patch = diff(&Value::from(deep), &Value::from(deeper)).unwrap();
        assert_eq!(Value::Map(patch), Value::from(json!({"a": {"b": {"c": {"d": 2}}}})));
    }
}
