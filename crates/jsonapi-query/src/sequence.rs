//! Generic sequence operation dispatcher.
//!
//! A [`Sequence`] is a collection of runtime-typed resources in one of two
//! flavors. The *deferred* flavor composes operations losslessly into a
//! single plan (repeated then-by calls extend one multi-key ordering) and
//! evaluates nothing until [`Sequence::enumerate`]. The *materialized*
//! flavor applies every operation immediately as a directly callable
//! function, preserving whatever order the elements arrived in. Operations
//! never mutate their input; they consume the handle and return a new one.
//!
//! Every sequence carries the element-type token captured at the call site
//! that constructed it; applying an operation to a sequence without a token
//! fails with [`QueryError::UnknownElementType`].

use std::cmp::Ordering;
use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use jsonapi_document::{Resource, ResourceFields};

use crate::error::QueryError;
use crate::predicate::{KeySelector, Predicate};

/// Shared handle to a runtime-typed resource
pub type ResourceRef = Arc<dyn Resource>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// One key of a (possibly multi-key) ordering
#[derive(Clone)]
pub struct SortKey {
    pub selector: KeySelector,
    pub direction: SortDirection,
}

/// The closed set of operations the dispatcher understands
#[derive(Clone)]
pub enum SequenceOp {
    Filter(Predicate),
    /// Start a new ordering with this key
    OrderBy(SortKey),
    /// Extend the current ordering with a subsequent key
    ThenBy(SortKey),
    Skip(usize),
    Take(usize),
}

/// A sequence of resources whose element type is only known at runtime
pub enum Sequence {
    Deferred(DeferredSequence),
    Materialized(MaterializedSequence),
}

/// Deferred flavor: a source plus a pending operation plan
pub struct DeferredSequence {
    element_type: Option<&'static str>,
    source: Vec<ResourceRef>,
    filters: Vec<Predicate>,
    ordering: Vec<SortKey>,
    skip: Option<usize>,
    take: Option<usize>,
}

/// Materialized flavor: already-realized elements
pub struct MaterializedSequence {
    element_type: Option<&'static str>,
    items: Vec<ResourceRef>,
    // kept so a later then-by can re-sort with the full key list
    ordering: Vec<SortKey>,
}

impl Sequence {
    /// Deferred sequence over a typed source; the element-type token is the
    /// type's declared name.
    pub fn deferred_from<T: ResourceFields + 'static>(items: Vec<T>) -> Self {
        Self::deferred(
            items.into_iter().map(|i| Arc::new(i) as ResourceRef).collect(),
            Some(T::NAME),
        )
    }

    /// Materialized sequence over a typed source
    pub fn materialized_from<T: ResourceFields + 'static>(items: Vec<T>) -> Self {
        Self::materialized(
            items.into_iter().map(|i| Arc::new(i) as ResourceRef).collect(),
            Some(T::NAME),
        )
    }

    pub fn deferred(source: Vec<ResourceRef>, element_type: Option<&'static str>) -> Self {
        Sequence::Deferred(DeferredSequence {
            element_type,
            source,
            filters: Vec::new(),
            ordering: Vec::new(),
            skip: None,
            take: None,
        })
    }

    pub fn materialized(items: Vec<ResourceRef>, element_type: Option<&'static str>) -> Self {
        Sequence::Materialized(MaterializedSequence { element_type, items, ordering: Vec::new() })
    }

    /// The element-type token captured at construction
    pub fn element_type(&self) -> Option<&'static str> {
        match self {
            Sequence::Deferred(s) => s.element_type,
            Sequence::Materialized(s) => s.element_type,
        }
    }

    /// Whether an ordering has been applied (pagination consults this)
    pub fn is_ordered(&self) -> bool {
        match self {
            Sequence::Deferred(s) => !s.ordering.is_empty(),
            Sequence::Materialized(s) => !s.ordering.is_empty(),
        }
    }

    pub fn is_deferred(&self) -> bool {
        matches!(self, Sequence::Deferred(_))
    }

    /// Apply one operation, producing a new sequence handle
    pub fn apply(self, op: SequenceOp) -> Result<Sequence, QueryError> {
        if self.element_type().is_none() {
            return Err(QueryError::UnknownElementType);
        }
        match self {
            Sequence::Deferred(s) => Ok(Sequence::Deferred(s.compose(op))),
            Sequence::Materialized(s) => Ok(Sequence::Materialized(s.run(op))),
        }
    }

    /// Realize the sequence, evaluating any pending plan
    pub fn enumerate(self) -> Vec<ResourceRef> {
        match self {
            Sequence::Deferred(s) => s.evaluate(),
            Sequence::Materialized(s) => s.items,
        }
    }
}

impl DeferredSequence {
    fn compose(mut self, op: SequenceOp) -> Self {
        match op {
            SequenceOp::Filter(predicate) => self.filters.push(predicate),
            SequenceOp::OrderBy(key) => self.ordering = vec![key],
            SequenceOp::ThenBy(key) => self.ordering.push(key),
            SequenceOp::Skip(n) => self.skip = Some(self.skip.unwrap_or(0).saturating_add(n)),
            SequenceOp::Take(n) => {
                self.take = Some(self.take.map_or(n, |existing| existing.min(n)))
            }
        }
        self
    }

    fn evaluate(self) -> Vec<ResourceRef> {
        debug!(
            filters = self.filters.len(),
            ordering = self.ordering.len(),
            "evaluating deferred sequence"
        );
        let mut items: Vec<ResourceRef> = self
            .source
            .into_iter()
            .filter(|item| self.filters.iter().all(|p| p(item.as_ref())))
            .collect();
        if !self.ordering.is_empty() {
            items.sort_by(|a, b| compare_with(&self.ordering, a.as_ref(), b.as_ref()));
        }
        let skip = self.skip.unwrap_or(0);
        let take = self.take.unwrap_or(usize::MAX);
        items.into_iter().skip(skip).take(take).collect()
    }
}

impl MaterializedSequence {
    fn run(mut self, op: SequenceOp) -> Self {
        match op {
            SequenceOp::Filter(predicate) => {
                self.items.retain(|item| predicate(item.as_ref()));
            }
            SequenceOp::OrderBy(key) => {
                self.ordering = vec![key];
                self.resort();
            }
            SequenceOp::ThenBy(key) => {
                self.ordering.push(key);
                self.resort();
            }
            SequenceOp::Skip(n) => {
                self.items = self.items.split_off(n.min(self.items.len()));
            }
            SequenceOp::Take(n) => {
                self.items.truncate(n);
            }
        }
        self
    }

    fn resort(&mut self) {
        let ordering = &self.ordering;
        self.items
            .sort_by(|a, b| compare_with(ordering, a.as_ref(), b.as_ref()));
    }
}

/// Compare two resources under a multi-key ordering; ties fall through to
/// subsequent keys in listed order.
fn compare_with(keys: &[SortKey], a: &dyn Resource, b: &dyn Resource) -> Ordering {
    for key in keys {
        let va = (key.selector)(a);
        let vb = (key.selector)(b);
        let ordering = match key.direction {
            SortDirection::Ascending => compare_values(&va, &vb),
            SortDirection::Descending => compare_values(&vb, &va),
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}

fn type_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}

/// Total order over JSON values: null first, numbers numerically, strings
/// lexicographically, mixed kinds by kind rank.
pub fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Number(_), Value::Number(_)) => {
            let (x, y) = (a.as_f64().unwrap_or(0.0), b.as_f64().unwrap_or(0.0));
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        _ => type_rank(a).cmp(&type_rank(b)),
    }
}
