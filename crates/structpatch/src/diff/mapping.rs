//! Mapping-level diff: compare two dynamic mappings key by key.
//!
//! Keys present only in `new` are emitted verbatim, keys present only in
//! `old` become delete markers, and keys present in both are emitted only
//! when their values differ. When both sides of a key are composite the
//! entry is a nested patch rather than the new value.

use tracing::trace;

use crate::diff::Differ;
use crate::equal::values_equal;
use crate::error::PatchResult;
use crate::value::{Mapping, Patch, Value};

impl Differ {
    pub(crate) fn mappings_at(
        &self,
        old: &Mapping,
        new: &Mapping,
        depth: usize,
    ) -> PatchResult<Patch> {
        let mut patch = Patch::new();

        for (key, new_val) in new {
            match old.get(key) {
                None => {
                    patch.insert(key.clone(), new_val.clone());
                }
                Some(old_val) if old_val.is_composite() && new_val.is_composite() => {
                    trace!(key = %key, depth, "descending into nested value");
                    let nested = self.diff_at(old_val, new_val, depth + 1)?;
                    if !nested.is_empty() {
                        patch.insert(key.clone(), Value::Map(nested));
                    }
                }
                Some(old_val) => {
                    if !values_equal(old_val, new_val) {
                        patch.insert(key.clone(), new_val.clone());
                    }
                }
            }
        }

        for key in old.keys() {
            if !new.contains_key(key) {
                patch.insert(key.clone(), Value::Delete);
            }
        }

        Ok(patch)
    }
}


#[cfg(test)]
mod properties {
    use proptest::prelude::*;

    use super::*;
    use crate::apply::apply_to_mapping;
    use crate::diff::diff_mappings;

    fn leaf() -> impl Strategy<Value = Value> {
        prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::Bool),
            any::<i64>().prop_map(Value::Int),
            "[a-z]{0,6}".prop_map(Value::Text),
        ]
    }

    fn value() -> impl Strategy<Value = Value> {
        leaf().prop_recursive(3, 24, 4, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..3).prop_map(Value::List),
                prop::collection::btree_map("[a-d]", inner, 0..4).prop_map(Value::Map),
            ]
        })
    }

    fn state() -> impl Strategy<Value = Mapping> {
        prop::collection::btree_map("[a-e]", value(), 0..5)
    }

    /// Arbitrary patches, not only ones produced by a diff: delete markers
    /// may appear at any depth, including under keys the target lacks.
    fn arbitrary_patch() -> impl Strategy<Value = Patch> {
        let entry = prop_oneof![leaf(), Just(Value::Delete)].prop_recursive(3, 24, 4, |inner| {
            prop::collection::btree_map("[a-d]", inner, 0..4).prop_map(Value::Map)
        });
        prop::collection::btree_map("[a-e]", entry, 0..5)
    }

    proptest! {
        #[test]
        fn patch_reproduces_new(old in state(), new in state()) {
            let patch = diff_mappings(&old, &new).unwrap();
            prop_assert_eq!(apply_to_mapping(&old, &patch), new);
        }

        #[test]
        fn apply_is_idempotent(old in state(), new in state()) {
            let patch = diff_mappings(&old, &new).unwrap();
            let once = apply_to_mapping(&old, &patch);
            let twice = apply_to_mapping(&once, &patch);
            prop_assert_eq!(twice, once);
        }

        #[test]
        fn apply_is_idempotent_for_any_patch(target in state(), patch in arbitrary_patch()) {
            let once = apply_to_mapping(&target, &patch);
            let twice = apply_to_mapping(&once, &patch);
            prop_assert_eq!(twice, once);
        }

        #[test]
        fn self_diff_is_empty(state in state()) {
            prop_assert!(diff_mappings(&state, &state).unwrap().is_empty());
        }
    }
}
