//! Derive macro for `structpatch` records.
//!
//! `#[derive(Record)]` generates a static field catalog plus index-based
//! getters and setters, so records are enumerated without runtime reflection.
//!
//! Field attributes (`#[patch(...)]` wins over `#[serde(...)]`):
//!
//! - `rename = "name"` -- external name; `"-"` excludes the field, `""` keeps the identifier
//! - `skip` -- exclude the field
//! - `omit_empty` / serde's `skip_serializing_if` -- recorded, never acted on
//!
//! Private fields are not part of the catalog. The struct must implement
//! `Clone` and `Default`; records built from a mapping start from `Default`.

use proc_macro::TokenStream;

mod attr;
mod record;

#[proc_macro_derive(Record, attributes(patch, serde))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    record::derive_record(input.into()).into()
}
