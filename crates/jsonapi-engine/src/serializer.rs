//! Resource graph serializer.
//!
//! Walks an object graph under the direction of its descriptors and builds
//! the document tree: primary data, relationship linkage, `included`
//! resources and links. Traversal threads a visited set keyed by
//! `(type, id)` through the walk - a related resource object is lifted into
//! `included` exactly once per identity no matter how many paths reach it,
//! and an already-visited identity is never re-descended into, which
//! terminates cyclic graphs.

use std::collections::{BTreeMap, HashSet};

use serde_json::{Map, Value};
use tracing::debug;

use jsonapi_document::{
    DescriptorRegistry, Document, JsonApiObject, PrimaryData, Related, Relationship,
    RelationshipData, RelationshipDescriptor, RelationshipKind, RelationshipLinks, Resource,
    ResourceDescriptor, ResourceIdentifier, ResourceLinks, ResourceObject, TopLevelLinks,
};
use jsonapi_query::{FieldsetContext, IncludeContext, PaginationContext, QueryParams, ResourceRef};

use crate::error::SerializeError;
use crate::paths::PathBuilder;

/// Primary data handed to the serializer
pub enum Primary {
    Null,
    One(ResourceRef),
    Many(Vec<ResourceRef>),
}

/// Coerce an id field value to its wire string form
pub(crate) fn value_to_id(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}

struct Traversal {
    visited: HashSet<(String, String)>,
    included: Vec<ResourceObject>,
}

/// Request-scoped serializer over shared, read-only descriptors
pub struct Serializer<'a> {
    registry: &'a DescriptorRegistry,
    paths: &'a dyn PathBuilder,
    fieldsets: &'a FieldsetContext,
    include: &'a IncludeContext,
}

impl<'a> Serializer<'a> {
    pub fn new(
        registry: &'a DescriptorRegistry,
        paths: &'a dyn PathBuilder,
        fieldsets: &'a FieldsetContext,
        include: &'a IncludeContext,
    ) -> Self {
        Self { registry, paths, fieldsets, include }
    }

    /// Serialize primary data into a document. A missing descriptor is a
    /// configuration error, not a silent null.
    pub fn serialize(
        &self,
        primary: Primary,
        descriptor: Option<&ResourceDescriptor>,
        pagination: Option<(&PaginationContext, &QueryParams)>,
    ) -> Result<Document, SerializeError> {
        let descriptor = descriptor.ok_or(SerializeError::MissingDescriptor)?;
        let mut traversal = Traversal { visited: HashSet::new(), included: Vec::new() };

        // Primary identities are claimed up front so no primary resource is
        // ever duplicated under `included`.
        let data = match primary {
            Primary::Null => PrimaryData::Null,
            Primary::One(resource) => {
                self.claim_identity(resource.as_ref(), descriptor, &mut traversal)?;
                PrimaryData::One(self.build_resource(resource.as_ref(), descriptor, &mut traversal)?)
            }
            Primary::Many(resources) => {
                for resource in &resources {
                    self.claim_identity(resource.as_ref(), descriptor, &mut traversal)?;
                }
                let objects = resources
                    .iter()
                    .map(|r| self.build_resource(r.as_ref(), descriptor, &mut traversal))
                    .collect::<Result<Vec<_>, _>>()?;
                PrimaryData::Many(objects)
            }
        };

        debug!(
            resource_type = descriptor.resource_type(),
            included = traversal.included.len(),
            "serialized resource graph"
        );

        let links = pagination.map(|(context, params)| TopLevelLinks {
            self_link: None,
            first: Some(context.first_page_link(params)),
            next: Some(context.next_page_link(params)),
            prev: context.previous_page_link(params),
        });

        Ok(Document {
            data: Some(data),
            errors: None,
            included: (!traversal.included.is_empty()).then_some(traversal.included),
            links,
            meta: None,
            jsonapi: Some(JsonApiObject::default()),
        })
    }

    fn claim_identity(
        &self,
        resource: &dyn Resource,
        descriptor: &ResourceDescriptor,
        traversal: &mut Traversal,
    ) -> Result<(), SerializeError> {
        let id = self.resource_id(resource, descriptor)?;
        traversal
            .visited
            .insert((descriptor.resource_type().to_string(), id));
        Ok(())
    }

    fn resource_id(
        &self,
        resource: &dyn Resource,
        descriptor: &ResourceDescriptor,
    ) -> Result<String, SerializeError> {
        resource
            .field(descriptor.id_field())
            .map(|value| value_to_id(&value))
            .ok_or_else(|| {
                SerializeError::shape_mismatch(descriptor.resource_type(), descriptor.id_field())
            })
    }

    fn build_resource(
        &self,
        resource: &dyn Resource,
        descriptor: &ResourceDescriptor,
        traversal: &mut Traversal,
    ) -> Result<ResourceObject, SerializeError> {
        let id = self.resource_id(resource, descriptor)?;
        let resource_type = descriptor.resource_type();

        let mut attributes = Map::new();
        for attr in descriptor.attributes() {
            if !self.fieldsets.allows(resource_type, &attr.wire_name) {
                continue;
            }
            let value = resource.field(&attr.field).ok_or_else(|| {
                SerializeError::shape_mismatch(resource_type, &attr.field)
            })?;
            attributes.insert(attr.wire_name.clone(), value);
        }

        let mut relationships = BTreeMap::new();
        for rel in descriptor.relationships() {
            if !self.fieldsets.allows(resource_type, &rel.wire_name) {
                continue;
            }
            let entry = self.build_relationship(resource, descriptor, &id, rel, traversal)?;
            relationships.insert(rel.wire_name.clone(), entry);
        }

        Ok(ResourceObject {
            id: id.clone(),
            resource_type: resource_type.to_string(),
            attributes: Some(attributes),
            relationships: (!relationships.is_empty()).then_some(relationships),
            links: Some(ResourceLinks {
                self_link: Some(self.paths.resource_path(descriptor, &id)),
            }),
        })
    }

    fn build_relationship(
        &self,
        resource: &dyn Resource,
        descriptor: &ResourceDescriptor,
        id: &str,
        rel: &RelationshipDescriptor,
        traversal: &mut Traversal,
    ) -> Result<Relationship, SerializeError> {
        let related_descriptor = self
            .registry
            .related(rel)
            .map_err(|_| SerializeError::UnregisteredRelatedType(rel.related_type.to_string()))?
            .clone();

        let related = resource.related(&rel.field).ok_or_else(|| {
            SerializeError::shape_mismatch(descriptor.resource_type(), &rel.field)
        })?;

        let data = match (rel.kind, related) {
            (RelationshipKind::ToOne, Related::ToOne(target)) => match target {
                Some(target) => {
                    let identifier = self.identifier(target, &related_descriptor)?;
                    self.embed(target, &related_descriptor, rel, traversal)?;
                    RelationshipData::One(identifier)
                }
                None => RelationshipData::Null,
            },
            (RelationshipKind::ToMany, Related::ToMany(targets)) => {
                let mut identifiers = Vec::with_capacity(targets.len());
                for target in targets {
                    identifiers.push(self.identifier(target, &related_descriptor)?);
                    self.embed(target, &related_descriptor, rel, traversal)?;
                }
                RelationshipData::Many(identifiers)
            }
            // descriptor and object disagree about the relationship arity
            _ => {
                return Err(SerializeError::shape_mismatch(
                    descriptor.resource_type(),
                    &rel.field,
                ));
            }
        };

        let links = if rel.link_policy.self_link || rel.link_policy.related_link {
            Some(RelationshipLinks {
                self_link: rel
                    .link_policy
                    .self_link
                    .then(|| self.paths.relationship_path(descriptor, id, rel)),
                related: rel
                    .link_policy
                    .related_link
                    .then(|| self.paths.related_path(descriptor, id, rel)),
            })
        } else {
            None
        };

        Ok(Relationship { links, data: Some(data) })
    }

    fn identifier(
        &self,
        target: &dyn Resource,
        descriptor: &ResourceDescriptor,
    ) -> Result<ResourceIdentifier, SerializeError> {
        let id = self.resource_id(target, descriptor)?;
        Ok(ResourceIdentifier::new(id, descriptor.resource_type()))
    }

    /// Lift a related resource object into `included` unless its identity
    /// was already claimed; marking before descending is what terminates
    /// cycles.
    fn embed(
        &self,
        target: &dyn Resource,
        descriptor: &ResourceDescriptor,
        rel: &RelationshipDescriptor,
        traversal: &mut Traversal,
    ) -> Result<(), SerializeError> {
        if !self.include.includes(&rel.wire_name) {
            return Ok(());
        }
        let identity = (
            descriptor.resource_type().to_string(),
            self.resource_id(target, descriptor)?,
        );
        if !traversal.visited.insert(identity) {
            return Ok(());
        }
        let object = self.build_resource(target, descriptor, traversal)?;
        traversal.included.push(object);
        Ok(())
    }
}
