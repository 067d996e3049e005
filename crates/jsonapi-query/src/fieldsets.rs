//! Sparse fieldsets: per-resource-type attribute/relationship allowlists.
//!
//! `fields[people]=first-name,age` restricts serialization of `people`
//! resources to the listed wire names. Types without an entry are
//! unrestricted.

use std::collections::HashMap;

use crate::params::{QueryParams, prefix};

/// Request-scoped fieldset context
#[derive(Debug, Clone, Default)]
pub struct FieldsetContext {
    allowlists: HashMap<String, Vec<String>>,
}

impl FieldsetContext {
    pub fn parse(params: &QueryParams) -> Self {
        let mut allowlists: HashMap<String, Vec<String>> = HashMap::new();
        for (resource_type, value) in params.with_prefix(prefix::FIELDS) {
            let fields = allowlists.entry(resource_type.to_string()).or_default();
            fields.extend(
                value
                    .split(',')
                    .map(str::trim)
                    .filter(|f| !f.is_empty())
                    .map(str::to_string),
            );
        }
        Self { allowlists }
    }

    pub fn is_empty(&self) -> bool {
        self.allowlists.is_empty()
    }

    /// Whether the wire field survives pruning for the given resource type
    pub fn allows(&self, resource_type: &str, wire_name: &str) -> bool {
        match self.allowlists.get(resource_type) {
            Some(fields) => fields.iter().any(|f| f == wire_name),
            None => true,
        }
    }
}
