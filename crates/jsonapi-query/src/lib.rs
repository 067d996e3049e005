//! # JSON:API Query Interpretation
//!
//! Interprets client-supplied query parameters (filter, sort, pagination,
//! sparse fieldsets, inclusion) and applies them to sequences whose element
//! type is only known at runtime. Each interpreter follows the same state
//! machine: parse its slice of the parameters into a request-scoped context,
//! no-op when the context is empty, otherwise apply operations through the
//! generic sequence dispatcher.
//!
//! ## Features
//! - Ordered query-parameter multimap with bracket/dotted normalization
//! - Reusable predicates and key selectors built once per parameter
//! - Deferred (composing) and materialized (immediate) sequence flavors
//! - String-to-value conversion and comparator registries in an immutable
//!   per-request configuration value

pub mod params;
pub mod convert;
pub mod predicate;
pub mod sequence;
pub mod filtering;
pub mod sorting;
pub mod pagination;
pub mod fieldsets;
pub mod include;
pub mod error;
pub mod prelude;

// Re-export main types
pub use params::QueryParams;
pub use convert::{ComparatorRegistry, ConverterRegistry, QueryConfig};
pub use predicate::{KeySelector, Predicate, build_predicate, build_selector};
pub use sequence::{ResourceRef, Sequence, SequenceOp, SortDirection, SortKey};
pub use filtering::{FilteringContext, FilteringProperty, apply_filtering};
pub use sorting::{SortingContext, SortingProperty, apply_sorting};
pub use pagination::{PaginationContext, apply_pagination};
pub use fieldsets::FieldsetContext;
pub use include::IncludeContext;
pub use error::QueryError;
