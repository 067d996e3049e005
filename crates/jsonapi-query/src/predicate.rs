//! Dynamic predicate and projection construction.
//!
//! Given a descriptor, a dashed field name and (for filtering) a raw string
//! value, these builders resolve the field once, coerce the value once and
//! resolve the comparison rule once, then hand back a closure that is
//! reusable across every element of a sequence. The special field name `id`
//! resolves to the descriptor's actual id field.

use std::sync::Arc;

use serde_json::Value;

use jsonapi_document::{FieldKind, Resource, ResourceDescriptor};

use crate::convert::QueryConfig;
use crate::error::QueryError;

/// A reusable boolean predicate over runtime-typed resources
pub type Predicate = Arc<dyn Fn(&dyn Resource) -> bool + Send + Sync>;

/// A reusable projection used as a sort key selector
pub type KeySelector = Arc<dyn Fn(&dyn Resource) -> Value + Send + Sync>;

/// Resolve a dashed query field against the descriptor, substituting the
/// real id field for the special name `id`.
fn resolve_field(
    descriptor: &ResourceDescriptor,
    dashed: &str,
) -> Option<(String, FieldKind)> {
    if dashed == "id" {
        return Some((descriptor.id_field().to_string(), descriptor.id_kind()));
    }
    descriptor
        .attribute(dashed)
        .map(|attr| (attr.field.clone(), attr.kind))
}

/// Build an equality (or registered-comparator) predicate closed over the
/// resolved field accessor and the coerced constant.
pub fn build_predicate(
    descriptor: &ResourceDescriptor,
    config: &QueryConfig,
    dashed_field: &str,
    raw_value: &str,
) -> Result<Predicate, QueryError> {
    let (field, kind) = resolve_field(descriptor, dashed_field)
        .ok_or_else(|| QueryError::FilterFieldNotFound(dashed_field.to_string()))?;

    let expected = config.converters().convert(kind, raw_value).ok_or_else(|| {
        QueryError::InvalidFilterValue {
            field: dashed_field.to_string(),
            value: raw_value.to_string(),
        }
    })?;
    let compare = config.comparators().resolve(kind);

    Ok(Arc::new(move |resource: &dyn Resource| {
        resource
            .field(&field)
            .map(|value| compare(&value, &expected))
            .unwrap_or(false)
    }))
}

/// Build a key selector for ordering. Resolution failures are reported as
/// sort-field errors (server class); resources missing the field at runtime
/// sort as null.
pub fn build_selector(
    descriptor: &ResourceDescriptor,
    dashed_field: &str,
) -> Result<KeySelector, QueryError> {
    let (field, _) = resolve_field(descriptor, dashed_field)
        .ok_or_else(|| QueryError::SortFieldNotFound(dashed_field.to_string()))?;

    Ok(Arc::new(move |resource: &dyn Resource| {
        resource.field(&field).unwrap_or(Value::Null)
    }))
}
