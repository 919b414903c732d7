//! Record-level diff: compare two records of one type slot by slot.
//!
//! Slots are read through the record's catalog, so no intermediate mapping
//! is built unless the two records differ in type.

use std::collections::HashSet;

use tracing::debug;

use crate::diff::Differ;
use crate::equal::values_equal;
use crate::error::PatchResult;
use crate::normalize::{normalize, to_mapping};
use crate::record::Record;
use crate::value::{Patch, Value};

impl Differ {
    pub(crate) fn records_at(
        &self,
        old: &dyn Record,
        new: &dyn Record,
        depth: usize,
    ) -> PatchResult<Patch> {
        if !old.same_type(new) {
            debug!(
                old = old.type_name(),
                new = new.type_name(),
                "record types differ, diffing as mappings"
            );
            return self.mappings_at(&to_mapping(old), &to_mapping(new), depth);
        }

        let old_catalog = old.catalog();
        let new_catalog = new.catalog();
        let mut patch = Patch::new();
        let mut seen = HashSet::new();

        for (index, field) in new_catalog.fields() {
            let name = field.name();
            if !seen.insert(name) {
                continue;
            }

            let new_val = new.get_field(index).unwrap_or(Value::Null);
            let old_val = old.get(name);

            if new_val.is_null() {
                if old_val.is_some_and(|v| !v.is_null()) {
                    patch.insert(name.to_string(), Value::Delete);
                }
                continue;
            }

            let old_val = match old_val {
                Some(v) if !v.is_null() => v,
                _ => {
                    patch.insert(name.to_string(), normalize(&new_val));
                    continue;
                }
            };

            let merges = field.kind().merges();
            if let Some(entry) = self.slot_change(&old_val, &new_val, merges, depth)? {
                patch.insert(name.to_string(), entry);
            }
        }

        for (index, field) in old_catalog.fields() {
            if seen.contains(field.name()) {
                continue;
            }
            if old.get_field(index).is_some_and(|v| !v.is_null()) {
                patch.insert(field.name().to_string(), Value::Delete);
            }
        }

        Ok(patch)
    }

    /// The patch entry for a slot set on both sides, if it changed.
    ///
    /// Slots that apply replaces wholesale (uniform maps) get the whole new
    /// value so that the patch reproduces `new` exactly.
    fn slot_change(
        &self,
        old: &Value,
        new: &Value,
        merges: bool,
        depth: usize,
    ) -> PatchResult<Option<Value>> {
        match (old, new) {
            (Value::Timestamp(a), Value::Timestamp(b)) => Ok((a != b).then(|| new.clone())),
            _ if merges && old.is_composite() && new.is_composite() => {
                let nested = self.diff_at(old, new, depth + 1)?;
                Ok((!nested.is_empty()).then_some(Value::Map(nested)))
            }
            _ => Ok((!values_equal(old, new)).then(|| normalize(new))),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use chrono::{TimeZone, Utc};
    use serde_json::json;

    use super::*;
    use crate::apply::apply_to_record;
    use crate::diff::diff_records;
    use crate::value::Mapping;

    #[derive(Debug, Clone, Default, PartialEq, crate::Record)]
    struct Address {
        pub street: String,
        pub city: String,
    }

    #[derive(Debug, Clone, Default, PartialEq, crate::Record)]
    struct Person {
        pub name: String,
        pub age: i32,
        pub nickname: Option<String>,
        pub tags: Vec<String>,
        pub address: Address,
        pub backup: Option<Address>,
        pub settings: Mapping,
        pub labels: HashMap<String, String>,
        pub updated: chrono::DateTime<Utc>,
        #[patch(skip)]
        pub cache: String,
    }

    fn person() -> Person {
        Person {
            name: "John".into(),
            age: 30,
            nickname: Some("JJ".into()),
            tags: vec!["admin".into()],
            address: Address {
                street: "123 Main St".into(),
                city: "NYC".into(),
            },
            backup: None,
            settings: Mapping::new(),
            labels: HashMap::new(),
            updated: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            cache: "ignored".into(),
        }
    }

    #[test]
    fn identical_records_no_diff() {
        assert!(diff_records(&person(), &person()).unwrap().is_empty());
    }

    #[test]
    fn leaf_changes() {
        let new = Person {
            name: "Jane".into(),
            age: 31,
            ..person()
        };
        let patch = diff_records(&person(), &new).unwrap();
        assert_eq!(Value::Map(patch), Value::from(json!({"name": "Jane", "age": 31})));
    }

    #[test]
    fn optional_transitions() {
        let cleared = Person {
            nickname: None,
            ..person()
        };
        let patch = diff_records(&person(), &cleared).unwrap();
        assert!(patch["nickname"].is_delete());

        let patch = diff_records(&cleared, &person()).unwrap();
        assert_eq!(patch["nickname"], Value::from("JJ"));

        assert!(diff_records(&cleared, &cleared).unwrap().is_empty());
    }

    #[test]
    fn nested_record_emits_nested_patch() {
        let mut new = person();
        new.address.city = "Boston".into();

        let patch = diff_records(&person(), &new).unwrap();
        assert_eq!(Value::Map(patch), Value::from(json!({"address": {"city": "Boston"}})));
    }

    #[test]
    fn optional_record_added_as_mapping() {
        let mut new = person();
        new.backup = Some(Address {
            street: "1 Side St".into(),
            city: "LA".into(),
        });

        let patch = diff_records(&person(), &new).unwrap();
        assert_eq!(
            patch["backup"],
            Value::from(json!({"street": "1 Side St", "city": "LA"}))
        );
    }

    #[test]
    fn map_fields_diff_by_key() {
        let mut old = person();
        old.settings = Value::from(json!({"theme": "dark", "lang": "en"}))
            .as_map()
            .cloned()
            .unwrap();
        old.labels.insert("env".into(), "prod".into());
        let mut new = old.clone();
        new.settings.remove("lang");
        new.settings.insert("theme".into(), Value::from("light"));
        new.labels.insert("team".into(), "core".into());

        let patch = diff_records(&old, &new).unwrap();
        let settings = patch["settings"].as_map().unwrap();
        assert_eq!(settings["theme"].as_str(), Some("light"));
        assert!(settings["lang"].is_delete());
        assert_eq!(
            patch["labels"],
            Value::from(json!({"env": "prod", "team": "core"}))
        );
    }

    #[test]
    fn sequences_and_timestamps_replace_whole() {
        let mut new = person();
        new.tags.push("ops".into());
        new.updated = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();

        let patch = diff_records(&person(), &new).unwrap();
        assert_eq!(patch["tags"], Value::from(vec!["admin", "ops"]));
        assert_eq!(patch["updated"], Value::Timestamp(new.updated));
        assert_eq!(patch.len(), 2);
    }

    #[test]
    fn skipped_fields_are_ignored() {
        let new = Person {
            cache: "changed".into(),
            ..person()
        };
        assert!(diff_records(&person(), &new).unwrap().is_empty());
    }

    #[test]
    fn patch_round_trips_onto_record() {
        let mut old = person();
        old.labels.insert("env".into(), "prod".into());
        let mut new = person();
        new.name = "Jane".into();
        new.nickname = None;
        new.address.city = "Boston".into();
        new.backup = Some(Address {
            street: "1 Side St".into(),
            city: "LA".into(),
        });
        new.settings.insert("beta".into(), Value::Bool(true));
        new.labels.insert("env".into(), "dev".into());
        new.labels.insert("team".into(), "core".into());

        let patch = diff_records(&old, &new).unwrap();
        let mut target = old.clone();
        apply_to_record(&mut target, &patch).unwrap();
        assert_eq!(target, new);
    }
}
