//! Convenience re-exports for downstream crates

pub use crate::convert::{ComparatorRegistry, ConverterRegistry, QueryConfig};
pub use crate::error::QueryError;
pub use crate::fieldsets::FieldsetContext;
pub use crate::filtering::{FilteringContext, apply_filtering};
pub use crate::include::IncludeContext;
pub use crate::pagination::{PaginationContext, apply_pagination};
pub use crate::params::{QueryParams, prefix};
pub use crate::sequence::{ResourceRef, Sequence, SequenceOp, SortDirection, SortKey};
pub use crate::sorting::{SortingContext, apply_sorting};
