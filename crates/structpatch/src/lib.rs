//! Structural diff and patch for typed records and dynamic mappings.
//!
//! Computes the minimal patch that turns one value into another, and applies
//! patches back onto records (in place) or mappings (as new copies). Records
//! expose their slots through a static field catalog generated by
//! `#[derive(Record)]`, so no runtime reflection is involved.
//!
//! # Key Types
//!
//! - [`Value`] / [`Mapping`] / [`Patch`] -- The dynamic value model, with
//!   [`Value::Delete`] marking removals
//! - [`Record`] / [`FieldCatalog`] / [`FieldDescriptor`] -- Typed records and
//!   their externally named slots
//! - [`FieldValue`] -- Coercion between typed slots and [`Value`]
//! - [`Differ`] / [`DiffConfig`] -- Diff engine with its recursion limit
//! - [`ChangeSet`] / [`Change`] -- Flat, path-addressed summary of a patch
//! - [`PatchError`] / [`CoerceError`] -- Apply and coercion failures

extern crate self as structpatch;

pub mod apply;
pub mod catalog;
pub mod coerce;
pub mod config;
pub mod diff;
pub mod equal;
pub mod error;
pub mod json;
pub mod normalize;
pub mod record;
pub mod value;

pub use apply::{apply, apply_to_mapping, apply_to_record};
pub use catalog::{FieldCatalog, FieldDescriptor, FieldKind};
pub use coerce::FieldValue;
pub use config::DiffConfig;
pub use diff::{diff, diff_mappings, diff_records, Change, ChangeSet, Differ, ROOT_KEY};
pub use equal::values_equal;
pub use error::{CoerceError, PatchError, PatchResult};
pub use json::{patch_from_json, NullPolicy};
pub use normalize::{normalize, to_mapping};
pub use record::Record;
pub use value::{Mapping, Patch, Value};

pub use structpatch_derive::Record;

#[doc(hidden)]
pub mod __private {
    pub use crate::apply::record_from_value;
}
