//! Convenience re-exports for downstream crates

pub use crate::descriptor::{
    DescriptorBuilder, DescriptorError, DescriptorRegistry, LinkPolicy, RelationshipDescriptor,
    RelationshipKind, ResourceDescriptor,
};
pub use crate::document::{
    Document, PrimaryData, Relationship, RelationshipData, ResourceIdentifier, ResourceObject,
    TopLevelLinks,
};
pub use crate::error::{ApiError, ErrorClass, ErrorObject, response_status};
pub use crate::resource::{FieldKind, Related, Resource, ResourceFields};
pub use crate::{JSONAPI_VERSION, MEDIA_TYPE};
