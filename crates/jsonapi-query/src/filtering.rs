//! Filtering interpreter: parse -> no-op if empty -> apply.
//!
//! Every `filter.<field>=<value>` pair becomes one predicate; predicates
//! chain left-to-right with AND semantics across all listed fields.

use tracing::warn;

use jsonapi_document::ResourceDescriptor;

use crate::convert::QueryConfig;
use crate::error::QueryError;
use crate::params::{QueryParams, prefix};
use crate::predicate::build_predicate;
use crate::sequence::{Sequence, SequenceOp};

/// One `(field, raw value)` filtering pair, in arrival order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilteringProperty {
    pub name: String,
    pub value: String,
}

/// Request-scoped filtering context
#[derive(Debug, Clone, Default)]
pub struct FilteringContext {
    pub properties: Vec<FilteringProperty>,
}

impl FilteringContext {
    pub fn parse(params: &QueryParams) -> Self {
        let properties = params
            .with_prefix(prefix::FILTER)
            .map(|(name, value)| FilteringProperty {
                name: name.to_string(),
                value: value.to_string(),
            })
            .collect();
        Self { properties }
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}

/// Apply the filtering context to a sequence. Empty contexts and sequences
/// whose element type does not match the descriptor pass through unchanged;
/// an unknown field is a client error naming the dashed field.
pub fn apply_filtering(
    sequence: Sequence,
    context: &FilteringContext,
    descriptor: &ResourceDescriptor,
    config: &QueryConfig,
) -> Result<Sequence, QueryError> {
    if context.is_empty() {
        return Ok(sequence);
    }
    if sequence.element_type() != Some(descriptor.type_token()) {
        warn!(
            expected = descriptor.type_token(),
            actual = ?sequence.element_type(),
            "element type mismatch, skipping filtering"
        );
        return Ok(sequence);
    }

    let mut sequence = sequence;
    for property in &context.properties {
        let predicate = build_predicate(descriptor, config, &property.name, &property.value)?;
        sequence = sequence.apply(SequenceOp::Filter(predicate))?;
    }
    Ok(sequence)
}
