//! Query-layer failures.
//!
//! The same "attribute not found" condition carries a different
//! classification depending on which interpreter raised it: an unknown
//! filter field is user input and therefore a client error, while an
//! unknown sort field is part of the caller/developer contract and is a
//! server error. That asymmetry is deliberate and load-bearing.

use jsonapi_document::{ApiError, ErrorClass};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("attribute '{0}' not found")]
    FilterFieldNotFound(String),

    #[error("attribute '{0}' not found")]
    SortFieldNotFound(String),

    #[error("invalid value '{value}' for attribute '{field}'")]
    InvalidFilterValue { field: String, value: String },

    #[error("page size {requested} exceeds the configured maximum of {max}")]
    PageSizeExceeded { requested: usize, max: usize },

    #[error("unable to apply query: the sequence's element type could not be determined")]
    UnknownElementType,

    #[error("resource type '{0}' does not expose an id field required for default ordering")]
    DefaultOrderingUnavailable(String),
}

impl QueryError {
    pub fn class(&self) -> ErrorClass {
        match self {
            QueryError::FilterFieldNotFound(_)
            | QueryError::InvalidFilterValue { .. }
            | QueryError::PageSizeExceeded { .. } => ErrorClass::Client,
            QueryError::SortFieldNotFound(_)
            | QueryError::UnknownElementType
            | QueryError::DefaultOrderingUnavailable(_) => ErrorClass::Server,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            QueryError::FilterFieldNotFound(_) => "filter-field-unknown",
            QueryError::SortFieldNotFound(_) => "sort-field-unknown",
            QueryError::InvalidFilterValue { .. } => "filter-value-invalid",
            QueryError::PageSizeExceeded { .. } => "page-size-exceeded",
            QueryError::UnknownElementType => "query-not-applicable",
            QueryError::DefaultOrderingUnavailable(_) => "default-ordering-unavailable",
        }
    }

    pub fn to_api_error(&self) -> ApiError {
        ApiError::new(self.to_string(), self.class()).with_code(self.code())
    }
}
