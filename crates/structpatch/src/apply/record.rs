//! In-place patching of typed records.

use tracing::trace;

use crate::apply::mapping::{apply_to_mapping, strip_markers};
use crate::error::{CoerceError, PatchError, PatchResult};
use crate::record::Record;
use crate::value::{Patch, Value};

/// Apply `patch` to `target` in place.
///
/// Each patch key must resolve to an included slot of the target's catalog.
/// A delete marker nulls a nullable slot. A mapping patched onto a slot
/// that currently holds a record or a dynamic mapping is merged into it,
/// preserving fields the patch does not mention; uniform maps and all other
/// slots are assigned with coercion.
///
/// The first failure aborts the call. Slots written before the failure keep
/// their new values; patch a copy when atomicity matters.
pub fn apply_to_record(target: &mut dyn Record, patch: &Patch) -> PatchResult<()> {
    let catalog = target.catalog();

    for (key, patch_value) in patch {
        let (index, field) = catalog.resolve(key).ok_or_else(|| PatchError::NotFound {
            record: catalog.type_name(),
            field: key.clone(),
        })?;

        if patch_value.is_delete() {
            if !field.is_nullable() {
                return Err(PatchError::Nullability { field: key.clone() });
            }
            target
                .set_field(index, Value::Null)
                .map_err(|e| PatchError::from_coerce(key, e))?;
            continue;
        }

        let value = match patch_value {
            Value::Map(nested) if field.kind().merges() => {
                trace!(record = catalog.type_name(), field = %key, "merging nested patch");
                merge_into(target.get_field(index), nested)?
            }
            other => other.clone(),
        };

        target
            .set_field(index, value)
            .map_err(|e| PatchError::from_coerce(key, e))?;
    }

    Ok(())
}

/// Merge a nested patch into a slot's current contents.
fn merge_into(current: Option<Value>, nested: &Patch) -> PatchResult<Value> {
    match current {
        Some(Value::Record(mut record)) => {
            apply_to_record(record.as_mut(), nested)?;
            Ok(Value::Record(record))
        }
        Some(Value::Map(existing)) => Ok(Value::Map(apply_to_mapping(&existing, nested))),
        _ => Ok(Value::Map(strip_markers(nested))),
    }
}

/// Build a record of type `R` from a value: either a record handle of the
/// same type, or a mapping applied onto `R::default()`.
pub fn record_from_value<R: Record + Default>(value: Value) -> Result<R, CoerceError> {
    match value {
        Value::Null | Value::Delete => Err(CoerceError::Null),
        Value::Record(record) => {
            let found = record.type_name();
            record
                .into_any()
                .downcast::<R>()
                .map(|record| *record)
                .map_err(|_| CoerceError::Mismatch {
                    expected: std::any::type_name::<R>(),
                    found,
                })
        }
        Value::Map(map) => {
            let mut record = R::default();
            apply_to_record(&mut record, &map).map_err(|e| CoerceError::Nested(Box::new(e)))?;
            Ok(record)
        }
        other => Err(CoerceError::mismatch(std::any::type_name::<R>(), &other)),
    }
}
