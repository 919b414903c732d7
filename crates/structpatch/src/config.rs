use serde::{Deserialize, Serialize};

/// Configuration for the diff engine.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiffConfig {
    /// Maximum nesting depth of records and mappings the engine descends
    /// into before giving up with [`PatchError::DepthExceeded`].
    ///
    /// [`PatchError::DepthExceeded`]: crate::PatchError::DepthExceeded
    pub max_depth: usize,
}

impl Default for DiffConfig {
    fn default() -> Self {
        Self { max_depth: 128 }
    }
}

impl DiffConfig {
    /// A configuration with the given depth limit.
    pub fn with_max_depth(max_depth: usize) -> Self {
        Self { max_depth }
    }
}
