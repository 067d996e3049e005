//! Engine-layer failures: serialization configuration errors (server class)
//! and inbound document validation (client class).

use jsonapi_document::{ApiError, ErrorClass};
use thiserror::Error;

/// Serialization failures. All of these are configuration mistakes on the
/// server side, never the client's fault.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SerializeError {
    #[error("you must declare the resource type for this endpoint")]
    MissingDescriptor,

    #[error("resource type '{resource_type}' declares field '{field}' which is absent on the serialized object")]
    ShapeMismatch { resource_type: String, field: String },

    #[error("no descriptor registered for resource type '{0}'")]
    UnregisteredRelatedType(String),
}

impl SerializeError {
    pub fn shape_mismatch(resource_type: &str, field: &str) -> Self {
        Self::ShapeMismatch {
            resource_type: resource_type.to_string(),
            field: field.to_string(),
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            SerializeError::MissingDescriptor => "resource-type-undeclared",
            SerializeError::ShapeMismatch { .. } => "descriptor-shape-mismatch",
            SerializeError::UnregisteredRelatedType(_) => "related-type-unregistered",
        }
    }

    pub fn to_api_error(&self) -> ApiError {
        ApiError::new(self.to_string(), ErrorClass::Server).with_code(self.code())
    }
}

/// Inbound document validation failure. Every top-level shape violation
/// maps to the same generic client error; no finer-grained message is
/// produced.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DeserializeError {
    #[error("invalid JSON:API request content")]
    InvalidContent,
}

impl DeserializeError {
    pub fn to_api_error(&self) -> ApiError {
        ApiError::new(self.to_string(), ErrorClass::Client).with_code("request-content-invalid")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialize_errors_are_server_class() {
        assert_eq!(SerializeError::MissingDescriptor.to_api_error().class, ErrorClass::Server);
        assert_eq!(
            SerializeError::shape_mismatch("people", "Age").to_api_error().class,
            ErrorClass::Server
        );
    }

    #[test]
    fn test_deserialize_error_is_client_class() {
        assert_eq!(DeserializeError::InvalidContent.to_api_error().class, ErrorClass::Client);
    }
}
