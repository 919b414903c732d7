//! Pure patching of dynamic mappings.

use tracing::debug;

use crate::apply::record::apply_to_record;
use crate::value::{Mapping, Patch, Value};

/// Apply `patch` to a copy of `target` and return the copy.
///
/// Neither input is modified. Nested mappings are merged key by key rather
/// than replaced. A record patched with a mapping is patched on a clone;
/// if that fails the raw patch mapping takes its place.
pub fn apply_to_mapping(target: &Mapping, patch: &Patch) -> Mapping {
    let mut result = target.clone();

    for (key, patch_value) in patch {
        if patch_value.is_delete() {
            result.remove(key);
            continue;
        }

        let merged = match (result.get(key), patch_value) {
            (Some(Value::Map(existing)), Value::Map(nested)) => {
                Value::Map(apply_to_mapping(existing, nested))
            }
            (Some(Value::Record(existing)), Value::Map(nested)) => {
                let mut record = existing.clone_record();
                match apply_to_record(record.as_mut(), nested) {
                    Ok(()) => Value::Record(record),
                    Err(err) => {
                        debug!(
                            key = %key,
                            record = record.type_name(),
                            error = %err,
                            "record patch failed, replacing with raw mapping"
                        );
                        Value::Map(strip_markers(nested))
                    }
                }
            }
            (_, Value::Map(nested)) => Value::Map(strip_markers(nested)),
            _ => patch_value.clone(),
        };

        result.insert(key.clone(), merged);
    }

    result
}

/// A nested patch landing where nothing can be merged: its delete markers
/// have nothing to remove and must not be stored.
pub(crate) fn strip_markers(nested: &Patch) -> Mapping {
    apply_to_mapping(&Mapping::new(), nested)
}
