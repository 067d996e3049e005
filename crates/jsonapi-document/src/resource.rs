//! Resource capability traits.
//!
//! Instead of reflecting over arbitrary objects at request time, every
//! domain type participating in serialization implements [`Resource`]
//! (field access by name) and [`ResourceFields`] (the declared schema,
//! resolved once when the descriptor for the type is built).

use serde_json::Value;

/// The declared kind of a model field, used to coerce raw query-parameter
/// strings and to pick comparison rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    String,
    Integer,
    Float,
    Boolean,
    /// RFC 3339 date-time carried as a string value
    DateTime,
    /// A custom scalar, registered by name in the converter/comparator registries
    Custom(&'static str),
}

/// A relationship value borrowed from a live resource instance.
pub enum Related<'a> {
    ToOne(Option<&'a dyn Resource>),
    ToMany(Vec<&'a dyn Resource>),
}

/// Runtime field access for a domain type.
///
/// `field` returns the value of a declared attribute (or the id field) as a
/// JSON value; `related` returns the resources behind a declared
/// relationship. Both are keyed by the *declared* field name, not the dashed
/// wire name - descriptors own that translation.
pub trait Resource: Send + Sync {
    /// The declared type token, matching [`ResourceFields::NAME`]
    fn resource_name(&self) -> &'static str;

    /// Look up a declared field by name
    fn field(&self, name: &str) -> Option<Value>;

    /// Look up a declared relationship by name
    fn related(&self, _name: &str) -> Option<Related<'_>> {
        None
    }
}

/// Static schema for a domain type: declared field names and kinds,
/// enumerated once at descriptor-construction time and cached there.
pub trait ResourceFields: Resource {
    /// Declared type token (e.g. `"Person"`); the default resource type
    /// string is derived from it by dashing.
    const NAME: &'static str;

    /// Declared name of the id field (e.g. `"Id"`)
    const ID_FIELD: &'static str = "Id";

    /// Declared kind of the id field
    const ID_KIND: FieldKind = FieldKind::String;

    /// Declared attribute fields, in serialization order. The id field must
    /// not appear here.
    fn fields() -> &'static [(&'static str, FieldKind)];

    /// Declared relationships: `(field name, to-many?, related type token)`
    fn relationships() -> &'static [(&'static str, bool, &'static str)] {
        &[]
    }
}
