//! Error types for the patch crate.

/// Errors that can occur while diffing or applying patches.
#[derive(Debug, thiserror::Error)]
pub enum PatchError {
    /// The patch names a field the target record does not expose.
    #[error("field {field:?} not found in {record}")]
    NotFound {
        /// Type name of the record being patched.
        record: &'static str,
        /// The unresolved external field name.
        field: String,
    },

    /// A patch value could not be coerced into the field's declared type.
    #[error("cannot set field {field:?}: {source}")]
    Type {
        field: String,
        #[source]
        source: CoerceError,
    },

    /// Null or deletion applied to a field that cannot hold null.
    #[error("cannot set non-nullable field {field:?} to null")]
    Nullability { field: String },

    /// `apply` was handed a null target.
    #[error("target is null")]
    NullTarget,

    /// `apply` was handed a target that is neither a record nor a mapping.
    #[error("target must be a record or mapping, got {found}")]
    InvalidTarget { found: &'static str },

    /// Nesting went deeper than the configured limit.
    #[error("nesting depth exceeds limit of {limit}")]
    DepthExceeded { limit: usize },
}

impl PatchError {
    /// Attach a field name to a coercion failure.
    ///
    /// Null failures become [`PatchError::Nullability`]; failures raised by a
    /// nested record application are passed through unchanged.
    pub fn from_coerce(field: &str, err: CoerceError) -> Self {
        match err {
            CoerceError::Null => Self::Nullability {
                field: field.to_string(),
            },
            CoerceError::Nested(inner) => *inner,
            other => Self::Type {
                field: field.to_string(),
                source: other,
            },
        }
    }

    /// The field name carried by this error, if any.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::NotFound { field, .. }
            | Self::Type { field, .. }
            | Self::Nullability { field } => Some(field),
            _ => None,
        }
    }
}

/// Errors raised when converting a [`Value`](crate::Value) into a typed slot.
#[derive(Debug, thiserror::Error)]
pub enum CoerceError {
    /// The value's shape has no conversion to the target type.
    #[error("cannot convert {found} to {expected}")]
    Mismatch {
        expected: &'static str,
        found: &'static str,
    },

    /// A string could not be parsed into a numeric or boolean type.
    #[error("cannot convert string {input:?} to {expected}: {reason}")]
    Parse {
        input: String,
        expected: &'static str,
        reason: String,
    },

    /// A string could not be parsed as an RFC 3339 timestamp.
    #[error("cannot parse time string {input:?}: {source}")]
    Time {
        input: String,
        #[source]
        source: chrono::ParseError,
    },

    /// Null where the target type has no null representation.
    #[error("null is not allowed")]
    Null,

    /// Patching a nested record failed.
    #[error(transparent)]
    Nested(Box<PatchError>),
}

impl CoerceError {
    pub(crate) fn mismatch(expected: &'static str, found: &crate::Value) -> Self {
        Self::Mismatch {
            expected,
            found: found.kind_name(),
        }
    }
}

/// Convenience alias for patch results.
pub type PatchResult<T> = Result<T, PatchError>;
