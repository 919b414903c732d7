//! The dynamic value model shared by the diff and apply engines.
//!
//! Every slot of a record, every entry of a mapping and every patch entry is a
//! [`Value`]. Records travel as opaque [`Record`] handles; timestamps are
//! atomic and never recursed into.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};

use crate::record::Record;

/// A dynamic, string-keyed collection of values.
pub type Mapping = BTreeMap<String, Value>;

/// A mapping describing the delta between two values.
///
/// Entries are either replacement values, nested patches (as [`Value::Map`])
/// or [`Value::Delete`] markers.
pub type Patch = Mapping;

/// A value of arbitrary shape.
pub enum Value {
    /// A legitimate null. Distinct from [`Value::Delete`].
    Null,
    Bool(bool),
    Int(i64),
    Uint(u64),
    Float(f64),
    Text(String),
    Bytes(Vec<u8>),
    /// An instant in time. Compared as a whole, never recursed into.
    Timestamp(DateTime<Utc>),
    List(Vec<Value>),
    Map(Mapping),
    /// A handle to a typed record.
    Record(Box<dyn Record>),
    /// Patch-only marker: remove this key from the target.
    Delete,
}

impl Value {
    /// A short name for the value's shape, used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Uint(_) => "uint",
            Self::Float(_) => "float",
            Self::Text(_) => "string",
            Self::Bytes(_) => "bytes",
            Self::Timestamp(_) => "timestamp",
            Self::List(_) => "list",
            Self::Map(_) => "mapping",
            Self::Record(_) => "record",
            Self::Delete => "delete marker",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn is_delete(&self) -> bool {
        matches!(self, Self::Delete)
    }

    /// Returns `true` for records and mappings, the shapes the engines recurse into.
    pub fn is_composite(&self) -> bool {
        matches!(self, Self::Map(_) | Self::Record(_))
    }

    pub fn as_map(&self) -> Option<&Mapping> {
        match self {
            Self::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&dyn Record> {
        match self {
            Self::Record(record) => Some(record.as_ref()),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Wrap a typed record.
    pub fn record<R: Record>(record: R) -> Self {
        Self::Record(Box::new(record))
    }
}

impl Clone for Value {
    fn clone(&self) -> Self {
        match self {
            Self::Null => Self::Null,
            Self::Bool(b) => Self::Bool(*b),
            Self::Int(i) => Self::Int(*i),
            Self::Uint(u) => Self::Uint(*u),
            Self::Float(f) => Self::Float(*f),
            Self::Text(s) => Self::Text(s.clone()),
            Self::Bytes(b) => Self::Bytes(b.clone()),
            Self::Timestamp(t) => Self::Timestamp(*t),
            Self::List(items) => Self::List(items.clone()),
            Self::Map(map) => Self::Map(map.clone()),
            Self::Record(record) => Self::Record(record.clone_record()),
            Self::Delete => Self::Delete,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("Null"),
            Self::Bool(b) => write!(f, "{b:?}"),
            Self::Int(i) => write!(f, "{i:?}"),
            Self::Uint(u) => write!(f, "{u:?}u"),
            Self::Float(x) => write!(f, "{x:?}"),
            Self::Text(s) => write!(f, "{s:?}"),
            Self::Bytes(b) => write!(f, "b{b:?}"),
            Self::Timestamp(t) => write!(f, "{}", t.to_rfc3339()),
            Self::List(items) => f.debug_list().entries(items).finish(),
            Self::Map(map) => f.debug_map().entries(map).finish(),
            Self::Record(record) => write!(f, "{record:?}"),
            Self::Delete => f.write_str("<delete>"),
        }
    }
}

/// Structural equality; see [`values_equal`](crate::equal::values_equal).
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        crate::equal::values_equal(self, other)
    }
}

impl Default for Value {
    fn default() -> Self {
        Self::Null
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

macro_rules! from_signed {
    ($($ty:ty),*) => {$(
        impl From<$ty> for Value {
            fn from(n: $ty) -> Self {
                Self::Int(n as i64)
            }
        }
    )*};
}

macro_rules! from_unsigned {
    ($($ty:ty),*) => {$(
        impl From<$ty> for Value {
            fn from(n: $ty) -> Self {
                Self::Uint(n as u64)
            }
        }
    )*};
}

from_signed!(i8, i16, i32, i64, isize);
from_unsigned!(u8, u16, u32, u64, usize);

impl From<f32> for Value {
    fn from(x: f32) -> Self {
        Self::Float(f64::from(x))
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Self::Float(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<&[u8]> for Value {
    fn from(bytes: &[u8]) -> Self {
        Self::Bytes(bytes.to_vec())
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(t: DateTime<Utc>) -> Self {
        Self::Timestamp(t)
    }
}

impl From<Mapping> for Value {
    fn from(map: Mapping) -> Self {
        Self::Map(map)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Self::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Self::Null, Into::into)
    }
}
