//! Field catalogs: the externally named slots of a record type.
//!
//! A catalog is built at compile time by `#[derive(Record)]` and lives in a
//! `static`. Slot order is declaration order; the index of a descriptor is the
//! index the record's getter and setter understand.

/// The exclusion sentinel accepted as an external name.
pub const EXCLUDE: &str = "-";

/// How the engines treat a slot's contents.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldKind {
    /// Primitive value, compared atomically.
    Leaf,
    /// Timestamp: composite in memory, atomic for diffing.
    Timestamp,
    /// Ordered sequence, compared element-wise but replaced wholesale.
    Sequence,
    /// Nested record, patched field by field.
    Record,
    /// Mapping of dynamic values, merged key by key.
    DynamicMap,
    /// Map with a single concrete value type, replaced wholesale.
    UniformMap,
    /// Slot holding a dynamic [`Value`](crate::Value) of any shape.
    Dynamic,
}

impl FieldKind {
    /// Whether a mapping patched into this slot is merged rather than
    /// assigned wholesale.
    pub const fn merges(self) -> bool {
        matches!(self, Self::Record | Self::DynamicMap | Self::Dynamic)
    }
}

/// Static description of one record slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldDescriptor {
    ident: &'static str,
    rename: Option<&'static str>,
    skip: bool,
    omit_empty: bool,
    nullable: bool,
    kind: FieldKind,
}

impl FieldDescriptor {
    pub const fn new(ident: &'static str, kind: FieldKind, nullable: bool) -> Self {
        Self {
            ident,
            rename: None,
            skip: false,
            omit_empty: false,
            nullable,
            kind,
        }
    }

    /// Override the external name. `"-"` excludes the slot; an empty name
    /// keeps the declared identifier.
    pub const fn rename(mut self, name: &'static str) -> Self {
        self.rename = Some(name);
        self
    }

    pub const fn skip(mut self) -> Self {
        self.skip = true;
        self
    }

    /// Record the omit-if-empty modifier. It is kept for introspection only:
    /// emptiness never causes a slot to be omitted.
    pub const fn omit_empty(mut self) -> Self {
        self.omit_empty = true;
        self
    }

    /// The identifier the slot was declared with.
    pub fn ident(&self) -> &'static str {
        self.ident
    }

    /// The name the slot is known by in mappings and patches.
    pub fn name(&self) -> &'static str {
        match self.rename {
            Some(name) if !name.is_empty() && name != EXCLUDE => name,
            _ => self.ident,
        }
    }

    pub fn is_excluded(&self) -> bool {
        self.skip || self.rename == Some(EXCLUDE)
    }

    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    pub fn has_omit_empty(&self) -> bool {
        self.omit_empty
    }

    pub fn kind(&self) -> FieldKind {
        self.kind
    }
}

/// The ordered set of slots of one record type.
#[derive(Debug)]
pub struct FieldCatalog {
    type_name: &'static str,
    fields: &'static [FieldDescriptor],
}

impl FieldCatalog {
    pub const fn new(type_name: &'static str, fields: &'static [FieldDescriptor]) -> Self {
        Self { type_name, fields }
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// All declared slots, including excluded ones.
    pub fn descriptors(&self) -> &'static [FieldDescriptor] {
        self.fields
    }

    /// Included slots with their setter index, in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = (usize, &'static FieldDescriptor)> {
        self.fields
            .iter()
            .enumerate()
            .filter(|(_, field)| !field.is_excluded())
    }

    /// Find the included slot with the given external name.
    ///
    /// Linear scan; when two slots share an external name the first declared
    /// one wins.
    pub fn resolve(&self, name: &str) -> Option<(usize, &'static FieldDescriptor)> {
        self.fields().find(|(_, field)| field.name() == name)
    }

    pub fn len(&self) -> usize {
        self.fields().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
