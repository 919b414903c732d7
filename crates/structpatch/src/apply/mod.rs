//! Apply engine: reconstruct a target state from a patch.
//!
//! Mappings are patched functionally ([`apply_to_mapping`] returns a new
//! mapping); records are patched in place ([`apply_to_record`]). [`apply`]
//! picks between the two by the target's runtime shape.

pub mod mapping;
pub mod record;

pub use mapping::apply_to_mapping;
pub use record::{apply_to_record, record_from_value};

use crate::diff::ROOT_KEY;
use crate::error::{PatchError, PatchResult};
use crate::value::{Patch, Value};

/// Apply `patch` to a record or mapping held in `target`.
///
/// A record is mutated in place; a mapping is replaced by its patched copy.
/// A patch whose only entry sits under [`ROOT_KEY`] is a wholesale
/// replacement and overwrites `target` whatever its shape.
pub fn apply(target: &mut Value, patch: &Patch) -> PatchResult<()> {
    if let Some(whole) = root_replacement(patch) {
        *target = match whole {
            Value::Delete => Value::Null,
            other => other.clone(),
        };
        return Ok(());
    }

    match target {
        Value::Record(record) => apply_to_record(record.as_mut(), patch),
        Value::Map(map) => {
            *map = apply_to_mapping(map, patch);
            Ok(())
        }
        Value::Null => Err(PatchError::NullTarget),
        other => Err(PatchError::InvalidTarget {
            found: other.kind_name(),
        }),
    }
}

fn root_replacement(patch: &Patch) -> Option<&Value> {
    match patch.len() {
        1 => patch.get(ROOT_KEY),
        _ => None,
    }
}
