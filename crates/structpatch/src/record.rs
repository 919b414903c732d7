//! The record abstraction: typed values with a static field catalog.

use std::any::{Any, TypeId};
use std::fmt;

use crate::catalog::FieldCatalog;
use crate::error::CoerceError;
use crate::value::Value;

/// A value with a fixed, statically known set of named slots.
///
/// Implemented by `#[derive(Record)]`. The trait is object safe so that
/// records of any type can travel inside [`Value::Record`]. Slots are
/// addressed by their index in [`Record::catalog`].
pub trait Record: Any + fmt::Debug {
    /// The static catalog of this record's type.
    fn catalog(&self) -> &'static FieldCatalog;

    /// Read a slot as a [`Value`]. Absent optionals read as [`Value::Null`].
    ///
    /// Returns `None` when `index` is out of range.
    fn get_field(&self, index: usize) -> Option<Value>;

    /// Coerce `value` into the slot's declared type and store it.
    fn set_field(&mut self, index: usize, value: Value) -> Result<(), CoerceError>;

    fn clone_record(&self) -> Box<dyn Record>;

    fn as_any(&self) -> &dyn Any;

    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

impl dyn Record {
    /// The concrete type of this record.
    pub fn record_type_id(&self) -> TypeId {
        self.as_any().type_id()
    }

    /// Whether `self` and `other` are records of the same concrete type.
    pub fn same_type(&self, other: &dyn Record) -> bool {
        self.record_type_id() == other.record_type_id()
    }

    pub fn type_name(&self) -> &'static str {
        self.catalog().type_name()
    }

    pub fn downcast_ref<R: Record>(&self) -> Option<&R> {
        self.as_any().downcast_ref::<R>()
    }

    /// Read a slot by its external name.
    pub fn get(&self, name: &str) -> Option<Value> {
        let (index, _) = self.catalog().resolve(name)?;
        self.get_field(index)
    }
}
