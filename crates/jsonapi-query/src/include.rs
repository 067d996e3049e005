//! Inclusion interpreter: which related resources land under `included`.
//!
//! An explicit `include` parameter wins, even when empty. When the client
//! sends none, the per-action default-included policy applies unless the
//! action suppresses defaults outright.

use crate::params::{QueryParams, prefix};

/// Request-scoped inclusion context
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IncludeContext {
    names: Vec<String>,
    /// True when the client sent the parameter explicitly
    pub explicit: bool,
}

impl IncludeContext {
    /// Parse the `include` parameter, falling back to the caller-supplied
    /// per-action defaults. `suppress_default` forces no default inclusion
    /// even when the client sends nothing.
    pub fn parse(params: &QueryParams, defaults: &[&str], suppress_default: bool) -> Self {
        match params.get(prefix::INCLUDE) {
            Some(raw) => Self {
                names: raw
                    .split(',')
                    .map(str::trim)
                    .filter(|name| !name.is_empty())
                    .map(str::to_string)
                    .collect(),
                explicit: true,
            },
            None if suppress_default => Self::default(),
            None => Self {
                names: defaults.iter().map(|name| name.to_string()).collect(),
                explicit: false,
            },
        }
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Whether the relationship (by dashed wire name) should be embedded
    pub fn includes(&self, wire_name: &str) -> bool {
        self.names.iter().any(|name| name == wire_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_parameter_wins() {
        let params = QueryParams::from_pairs([("include", "author,comments")]);
        let context = IncludeContext::parse(&params, &["tags"], false);
        assert!(context.explicit);
        assert!(context.includes("author"));
        assert!(context.includes("comments"));
        assert!(!context.includes("tags"));
    }

    #[test]
    fn test_default_policy_applies_when_absent() {
        let context = IncludeContext::parse(&QueryParams::new(), &["author"], false);
        assert!(!context.explicit);
        assert!(context.includes("author"));
    }

    #[test]
    fn test_suppressed_default() {
        let context = IncludeContext::parse(&QueryParams::new(), &["author"], true);
        assert!(context.is_empty());
    }

    #[test]
    fn test_explicit_empty_disables_defaults() {
        let params = QueryParams::from_pairs([("include", "")]);
        let context = IncludeContext::parse(&params, &["author"], false);
        assert!(context.explicit);
        assert!(context.is_empty());
    }
}
