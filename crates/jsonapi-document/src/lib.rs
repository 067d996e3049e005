//! # JSON:API Document Model
//!
//! This crate provides the foundation types for building and consuming
//! JSON:API (<https://jsonapi.org>) documents. It contains the wire-level
//! document shapes, the declarative resource descriptor model that maps a
//! domain type onto its JSON:API representation, and the error objects used
//! for failure envelopes.
//!
//! ## Features
//! - Serde-backed wire types for `data`, `included`, `links`, `relationships`
//! - Declarative, validated resource descriptors shared across requests
//! - A small capability trait (`Resource`) replacing runtime reflection
//! - Client/server error classification with aggregate status selection

pub mod naming;
pub mod resource;
pub mod descriptor;
pub mod document;
pub mod error;
pub mod prelude;


// Re-export main types
pub use resource::{FieldKind, Related, Resource, ResourceFields};
pub use descriptor::{
    AttributeDescriptor, DescriptorBuilder, DescriptorError, DescriptorRegistry, LinkPolicy,
    RelationshipDescriptor, RelationshipKind, ResourceDescriptor,
};
pub use document::{
    Document, JsonApiObject, PrimaryData, Relationship, RelationshipData, RelationshipLinks,
    ResourceIdentifier, ResourceLinks, ResourceObject, TopLevelLinks,
};
pub use error::{ApiError, ErrorClass, ErrorObject, response_status};

/// The JSON:API media type
pub const MEDIA_TYPE: &str = "application/vnd.api+json";

/// The JSON:API specification version emitted in the `jsonapi` member
pub const JSONAPI_VERSION: &str = "1.0";
