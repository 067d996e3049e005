//! Resource descriptors.
//!
//! A [`ResourceDescriptor`] is the declarative mapping from one domain type
//! to its JSON:API wire shape: resource type string, id field, ordered
//! attributes and relationships. Descriptors are built once (normally at
//! process start), validated eagerly, and shared read-only across requests
//! through a [`DescriptorRegistry`]. Relationship descriptors reference the
//! related type by token rather than holding the related descriptor, so
//! cyclic descriptor graphs (A -> B -> A) cost nothing at construction and
//! resolve through the registry during traversal.

use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;

use crate::naming;
use crate::resource::{FieldKind, Resource, ResourceFields};

/// Member names the JSON:API specification reserves at the resource level.
const RESERVED_FIELDS: &[&str] = &["id", "links", "relationships"];

/// Errors raised while building a descriptor or resolving one from the registry
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DescriptorError {
    #[error("field '{0}' is reserved and cannot be declared as an attribute or relationship")]
    ReservedField(String),

    #[error("field '{0}' is declared more than once")]
    DuplicateField(String),

    #[error("no descriptor registered for resource type '{0}'")]
    Unregistered(String),
}

/// One exposed attribute: declared field name, dashed wire name, kind
#[derive(Debug, Clone)]
pub struct AttributeDescriptor {
    pub field: String,
    pub wire_name: String,
    pub kind: FieldKind,
}

/// To-one or to-many
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationshipKind {
    ToOne,
    ToMany,
}

/// Which relationship links to emit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkPolicy {
    pub self_link: bool,
    pub related_link: bool,
}

impl LinkPolicy {
    pub const ALL: LinkPolicy = LinkPolicy { self_link: true, related_link: true };
    pub const NONE: LinkPolicy = LinkPolicy { self_link: false, related_link: false };
}

impl Default for LinkPolicy {
    fn default() -> Self {
        LinkPolicy::ALL
    }
}

/// One declared relationship. `related_type` is the declared type token of
/// the related domain type; the related descriptor itself is looked up in
/// the registry at traversal time.
#[derive(Debug, Clone)]
pub struct RelationshipDescriptor {
    pub field: String,
    pub wire_name: String,
    pub kind: RelationshipKind,
    pub related_type: &'static str,
    pub url_path: Option<String>,
    pub link_policy: LinkPolicy,
}

/// Declarative mapping from a domain type to its JSON:API shape.
///
/// Immutable after construction; share it behind an `Arc`.
#[derive(Debug, Clone)]
pub struct ResourceDescriptor {
    resource_type: String,
    type_token: &'static str,
    id_field: String,
    id_kind: FieldKind,
    attributes: Vec<AttributeDescriptor>,
    relationships: Vec<RelationshipDescriptor>,
}

impl ResourceDescriptor {
    /// Start a builder seeded from the type's declared schema
    pub fn for_type<T: ResourceFields>() -> DescriptorBuilder {
        let mut builder = DescriptorBuilder::new(T::NAME)
            .id_field(T::ID_FIELD, T::ID_KIND);
        for &(field, kind) in T::fields() {
            builder = builder.attribute(field, kind);
        }
        for &(field, to_many, related) in T::relationships() {
            builder = if to_many {
                builder.has_many(field, related)
            } else {
                builder.has_one(field, related)
            };
        }
        builder
    }

    /// The kebab-case resource type string emitted as `type`
    pub fn resource_type(&self) -> &str {
        &self.resource_type
    }

    /// The declared type token this descriptor was built for
    pub fn type_token(&self) -> &'static str {
        self.type_token
    }

    /// Declared name of the id field
    pub fn id_field(&self) -> &str {
        &self.id_field
    }

    /// Declared kind of the id field
    pub fn id_kind(&self) -> FieldKind {
        self.id_kind
    }

    /// Declared attributes, in serialization order
    pub fn attributes(&self) -> &[AttributeDescriptor] {
        &self.attributes
    }

    /// Declared relationships, in serialization order
    pub fn relationships(&self) -> &[RelationshipDescriptor] {
        &self.relationships
    }

    /// Find an attribute by its dashed wire name, falling back to the
    /// declared field name.
    pub fn attribute(&self, name: &str) -> Option<&AttributeDescriptor> {
        self.attributes
            .iter()
            .find(|a| a.wire_name == name)
            .or_else(|| self.attributes.iter().find(|a| a.field == name))
    }

    /// Find a relationship by dashed wire name or declared field name
    pub fn relationship(&self, name: &str) -> Option<&RelationshipDescriptor> {
        self.relationships
            .iter()
            .find(|r| r.wire_name == name)
            .or_else(|| self.relationships.iter().find(|r| r.field == name))
    }
}

/// Fallible builder for [`ResourceDescriptor`]
#[derive(Debug)]
pub struct DescriptorBuilder {
    resource_type: Option<String>,
    type_token: &'static str,
    id_field: String,
    id_kind: FieldKind,
    attributes: Vec<AttributeDescriptor>,
    relationships: Vec<RelationshipDescriptor>,
}

impl DescriptorBuilder {
    pub fn new(type_token: &'static str) -> Self {
        Self {
            resource_type: None,
            type_token,
            id_field: "Id".to_string(),
            id_kind: FieldKind::String,
            attributes: Vec::new(),
            relationships: Vec::new(),
        }
    }

    /// Override the wire resource type (default: dashed form of the token)
    pub fn resource_type(mut self, resource_type: impl Into<String>) -> Self {
        self.resource_type = Some(resource_type.into());
        self
    }

    pub fn id_field(mut self, field: impl Into<String>, kind: FieldKind) -> Self {
        self.id_field = field.into();
        self.id_kind = kind;
        self
    }

    pub fn attribute(mut self, field: impl Into<String>, kind: FieldKind) -> Self {
        let field = field.into();
        let wire_name = naming::to_dashed(&field);
        self.attributes.push(AttributeDescriptor { field, wire_name, kind });
        self
    }

    pub fn has_one(self, field: impl Into<String>, related_type: &'static str) -> Self {
        self.relationship(field, RelationshipKind::ToOne, related_type)
    }

    pub fn has_many(self, field: impl Into<String>, related_type: &'static str) -> Self {
        self.relationship(field, RelationshipKind::ToMany, related_type)
    }

    fn relationship(
        mut self,
        field: impl Into<String>,
        kind: RelationshipKind,
        related_type: &'static str,
    ) -> Self {
        let field = field.into();
        let wire_name = naming::to_dashed(&field);
        self.relationships.push(RelationshipDescriptor {
            field,
            wire_name,
            kind,
            related_type,
            url_path: None,
            link_policy: LinkPolicy::default(),
        });
        self
    }

    /// Override the URL path segment of the most recently declared relationship
    pub fn url_path(mut self, path: impl Into<String>) -> Self {
        if let Some(rel) = self.relationships.last_mut() {
            rel.url_path = Some(path.into());
        }
        self
    }

    /// Override the link policy of the most recently declared relationship
    pub fn link_policy(mut self, policy: LinkPolicy) -> Self {
        if let Some(rel) = self.relationships.last_mut() {
            rel.link_policy = policy;
        }
        self
    }

    /// Validate and build. Reserved names (`id`, `links`, `relationships`)
    /// and duplicate declarations fail here, not at request time.
    pub fn build(self) -> Result<ResourceDescriptor, DescriptorError> {
        let mut seen: Vec<&str> = Vec::new();
        for wire in self
            .attributes
            .iter()
            .map(|a| a.wire_name.as_str())
            .chain(self.relationships.iter().map(|r| r.wire_name.as_str()))
        {
            if RESERVED_FIELDS.contains(&wire) {
                return Err(DescriptorError::ReservedField(wire.to_string()));
            }
            if seen.contains(&wire) {
                return Err(DescriptorError::DuplicateField(wire.to_string()));
            }
            seen.push(wire);
        }
        Ok(ResourceDescriptor {
            resource_type: self
                .resource_type
                .unwrap_or_else(|| naming::to_dashed(self.type_token)),
            type_token: self.type_token,
            id_field: self.id_field,
            id_kind: self.id_kind,
            attributes: self.attributes,
            relationships: self.relationships,
        })
    }
}

/// Registry of all descriptors known to the process.
///
/// Build it fully, wrap it in an `Arc`, and share it; there is no interior
/// mutability, so concurrent readers never observe a partially-registered
/// descriptor.
#[derive(Debug, Default)]
pub struct DescriptorRegistry {
    by_type: HashMap<String, Arc<ResourceDescriptor>>,
    by_token: HashMap<&'static str, Arc<ResourceDescriptor>>,
}

impl DescriptorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a descriptor, returning the shared handle
    pub fn register(&mut self, descriptor: ResourceDescriptor) -> Arc<ResourceDescriptor> {
        let descriptor = Arc::new(descriptor);
        self.by_type
            .insert(descriptor.resource_type().to_string(), Arc::clone(&descriptor));
        self.by_token
            .insert(descriptor.type_token(), Arc::clone(&descriptor));
        descriptor
    }

    /// Look up by wire resource type (e.g. `"people"` or `"person"`)
    pub fn get(&self, resource_type: &str) -> Option<&Arc<ResourceDescriptor>> {
        self.by_type.get(resource_type)
    }

    /// Look up by declared type token (e.g. `"Person"`)
    pub fn get_by_token(&self, token: &str) -> Option<&Arc<ResourceDescriptor>> {
        self.by_token.get(token)
    }

    /// The descriptor for a live resource instance
    pub fn descriptor_for(&self, resource: &dyn Resource) -> Option<&Arc<ResourceDescriptor>> {
        self.get_by_token(resource.resource_name())
    }

    /// Resolve the related descriptor of a relationship
    pub fn related(
        &self,
        relationship: &RelationshipDescriptor,
    ) -> Result<&Arc<ResourceDescriptor>, DescriptorError> {
        self.get_by_token(relationship.related_type)
            .ok_or_else(|| DescriptorError::Unregistered(relationship.related_type.to_string()))
    }
}
