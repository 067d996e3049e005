//! Sorting interpreter.
//!
//! The `sort` parameter is a comma-separated list of field tokens. A `-`
//! prefix sorts descending; a leading `+` is equivalent to no prefix. The
//! first token starts the ordering, subsequent tokens extend it, so ties
//! break by the listed keys in order. Unknown sort fields are server
//! errors (contrast with filtering, where they are client errors).

use jsonapi_document::ResourceDescriptor;

use crate::error::QueryError;
use crate::params::{QueryParams, prefix};
use crate::predicate::build_selector;
use crate::sequence::{Sequence, SequenceOp, SortDirection, SortKey};

/// One sort token, in listed order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortingProperty {
    pub name: String,
    pub direction: SortDirection,
}

/// Request-scoped sorting context
#[derive(Debug, Clone, Default)]
pub struct SortingContext {
    pub properties: Vec<SortingProperty>,
}

impl SortingContext {
    pub fn parse(params: &QueryParams) -> Self {
        let properties = params
            .get(prefix::SORT)
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|token| !token.is_empty())
                    .map(|token| match token.strip_prefix('-') {
                        Some(name) => SortingProperty {
                            name: name.to_string(),
                            direction: SortDirection::Descending,
                        },
                        None => SortingProperty {
                            name: token.strip_prefix('+').unwrap_or(token).to_string(),
                            direction: SortDirection::Ascending,
                        },
                    })
                    .collect()
            })
            .unwrap_or_default();
        Self { properties }
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}

/// Apply the sorting context: order-by for the first key, then-by for the
/// rest. Empty contexts are no-ops.
pub fn apply_sorting(
    sequence: Sequence,
    context: &SortingContext,
    descriptor: &ResourceDescriptor,
) -> Result<Sequence, QueryError> {
    if context.is_empty() {
        return Ok(sequence);
    }

    let mut sequence = sequence;
    for (index, property) in context.properties.iter().enumerate() {
        let key = SortKey {
            selector: build_selector(descriptor, &property.name)?,
            direction: property.direction,
        };
        let op = if index == 0 { SequenceOp::OrderBy(key) } else { SequenceOp::ThenBy(key) };
        sequence = sequence.apply(op)?;
    }
    Ok(sequence)
}
