//! Value conversion and comparison registries, and the immutable
//! per-request [`QueryConfig`] that carries them.
//!
//! Filtering works on raw query-parameter strings; before a predicate can
//! be built the raw string must be coerced into the field's declared kind.
//! Comparison rules resolve by exact kind first (a custom scalar name is the
//! most exact match), then fall back through the scalar's base kind to the
//! built-in equality rule.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::DateTime;
use once_cell::sync::Lazy;
use serde_json::Value;

use jsonapi_document::FieldKind;

/// A string-to-value conversion rule; `None` signals a conversion failure
pub type ConvertFn = Arc<dyn Fn(&str) -> Option<Value> + Send + Sync>;

/// A binary comparison rule for filtering
pub type CompareFn = Arc<dyn Fn(&Value, &Value) -> bool + Send + Sync>;

/// Registry of string-conversion rules keyed by custom scalar name.
/// Built-in kinds (string, integer, float, boolean, date-time) need no
/// registration.
#[derive(Clone, Default)]
pub struct ConverterRegistry {
    custom: HashMap<&'static str, ConvertFn>,
}

impl ConverterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, name: &'static str, rule: ConvertFn) {
        self.custom.insert(name, rule);
    }

    /// Coerce a raw parameter string into a value of the given kind
    pub fn convert(&self, kind: FieldKind, raw: &str) -> Option<Value> {
        match kind {
            FieldKind::String => Some(Value::String(raw.to_string())),
            FieldKind::Integer => raw.parse::<i64>().ok().map(Value::from),
            FieldKind::Float => raw.parse::<f64>().ok().map(Value::from),
            FieldKind::Boolean => match raw.to_ascii_lowercase().as_str() {
                "true" | "1" => Some(Value::Bool(true)),
                "false" | "0" => Some(Value::Bool(false)),
                _ => None,
            },
            // validated, carried as the original string
            FieldKind::DateTime => DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|_| Value::String(raw.to_string())),
            FieldKind::Custom(name) => match self.custom.get(name) {
                Some(rule) => rule(raw),
                None => Some(Value::String(raw.to_string())),
            },
        }
    }
}

impl std::fmt::Debug for ConverterRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConverterRegistry")
            .field("custom", &self.custom.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Registry of comparison rules keyed by field kind.
///
/// Resolution order: exact kind (which for `Custom(name)` is the scalar
/// name), then `FieldKind::String` as the base of unregistered custom
/// scalars, then built-in equality.
#[derive(Clone, Default)]
pub struct ComparatorRegistry {
    rules: HashMap<FieldKind, CompareFn>,
}

impl ComparatorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, kind: FieldKind, rule: CompareFn) {
        self.rules.insert(kind, rule);
    }

    pub fn resolve(&self, kind: FieldKind) -> CompareFn {
        if let Some(rule) = self.rules.get(&kind) {
            return Arc::clone(rule);
        }
        if let FieldKind::Custom(_) = kind {
            if let Some(rule) = self.rules.get(&FieldKind::String) {
                return Arc::clone(rule);
            }
        }
        Arc::clone(&EQUALITY)
    }
}

impl std::fmt::Debug for ComparatorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComparatorRegistry")
            .field("rules", &self.rules.keys().collect::<Vec<_>>())
            .finish()
    }
}

static EQUALITY: Lazy<CompareFn> = Lazy::new(|| Arc::new(|a, b| value_equals(a, b)));

/// Built-in equality: numbers compare numerically, everything else by value
pub fn value_equals(a: &Value, b: &Value) -> bool {
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => x == y,
        _ => a == b,
    }
}

/// Immutable configuration handed to the interpreters and serializer at the
/// start of request processing. No process-wide mutable state.
#[derive(Debug, Clone)]
pub struct QueryConfig {
    pub default_page_size: usize,
    pub max_page_size: usize,
    /// Paginate list responses even when the client sends no page parameters
    pub paginate_by_default: bool,
    converters: ConverterRegistry,
    comparators: ComparatorRegistry,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            default_page_size: 10,
            max_page_size: 100,
            paginate_by_default: false,
            converters: ConverterRegistry::new(),
            comparators: ComparatorRegistry::new(),
        }
    }
}

impl QueryConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_default_page_size(mut self, size: usize) -> Self {
        self.default_page_size = size;
        self
    }

    pub fn with_max_page_size(mut self, size: usize) -> Self {
        self.max_page_size = size;
        self
    }

    pub fn with_default_pagination(mut self, enabled: bool) -> Self {
        self.paginate_by_default = enabled;
        self
    }

    pub fn with_converter(mut self, name: &'static str, rule: ConvertFn) -> Self {
        self.converters.register(name, rule);
        self
    }

    pub fn with_comparator(mut self, kind: FieldKind, rule: CompareFn) -> Self {
        self.comparators.register(kind, rule);
        self
    }

    pub fn converters(&self) -> &ConverterRegistry {
        &self.converters
    }

    pub fn comparators(&self) -> &ComparatorRegistry {
        &self.comparators
    }
}
