//! Flat, path-addressed view of a patch.
//!
//! A [`Patch`] is nested; a [`ChangeSet`] lists every leaf-level change it
//! makes against a base mapping, each addressed by a dotted path. Used for
//! human-readable summaries.

use crate::normalize::normalize;
use crate::value::{Mapping, Patch, Value};

/// The changes a patch makes to a base mapping.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChangeSet {
    /// The list of changes, ordered by path.
    pub changes: Vec<Change>,
}

impl ChangeSet {
    /// Create an empty change set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Describe what `patch` does when applied to `base`.
    pub fn from_patch(base: &Mapping, patch: &Patch) -> Self {
        let mut changes = Vec::new();
        collect(base, patch, "", &mut changes);
        Self { changes }
    }

    /// Returns `true` if there are no changes.
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Number of changes.
    pub fn len(&self) -> usize {
        self.changes.len()
    }

    /// Number of added keys.
    pub fn additions(&self) -> usize {
        self.changes
            .iter()
            .filter(|c| matches!(c, Change::Added { .. }))
            .count()
    }

    /// Number of removed keys.
    pub fn removals(&self) -> usize {
        self.changes
            .iter()
            .filter(|c| matches!(c, Change::Removed { .. }))
            .count()
    }

    /// Number of modified keys.
    pub fn modifications(&self) -> usize {
        self.changes
            .iter()
            .filter(|c| matches!(c, Change::Modified { .. }))
            .count()
    }
}

/// A single change at a dotted path.
#[derive(Clone, Debug, PartialEq)]
pub enum Change {
    /// A new key was added.
    Added { path: String, value: Value },
    /// An existing key was removed.
    Removed { path: String, old: Value },
    /// An existing key's value was replaced.
    Modified { path: String, old: Value, new: Value },
}

impl Change {
    pub fn path(&self) -> &str {
        match self {
            Self::Added { path, .. } | Self::Removed { path, .. } | Self::Modified { path, .. } => {
                path
            }
        }
    }
}

fn collect(base: &Mapping, patch: &Patch, prefix: &str, out: &mut Vec<Change>) {
    for (key, patch_value) in patch {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };

        match (base.get(key).map(normalize), patch_value) {
            (None, Value::Delete) => {}
            (None, value) => out.push(Change::Added {
                path,
                value: normalize(value),
            }),
            (Some(old), Value::Delete) => out.push(Change::Removed { path, old }),
            (Some(Value::Map(nested_base)), Value::Map(nested)) => {
                collect(&nested_base, nested, &path, out);
            }
            (Some(old), value) => out.push(Change::Modified {
                path,
                old,
                new: normalize(value),
            }),
        }
    }
}
