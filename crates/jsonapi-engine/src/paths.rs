//! Link URL construction from route metadata.
//!
//! The host supplies the request's route template and base path; the engine
//! only ever uses them to build `links` values, never for dispatch.

use jsonapi_document::{RelationshipDescriptor, ResourceDescriptor};

/// Route metadata supplied by the host for the current request
#[derive(Debug, Clone, Default)]
pub struct RouteInfo {
    /// Base path of the API, e.g. `/api`
    pub base_path: String,
    /// Route template, e.g. `people/{id}`
    pub template: String,
}

impl RouteInfo {
    pub fn new(base_path: impl Into<String>, template: impl Into<String>) -> Self {
        Self { base_path: base_path.into(), template: template.into() }
    }
}

/// Strategy for building resource and relationship link URLs
pub trait PathBuilder: Send + Sync {
    /// Path of the resource collection, e.g. `/api/people`
    fn collection_path(&self, descriptor: &ResourceDescriptor) -> String;

    /// `links.self` of one resource instance
    fn resource_path(&self, descriptor: &ResourceDescriptor, id: &str) -> String {
        format!("{}/{}", self.collection_path(descriptor), id)
    }

    /// `links.self` of a relationship entry
    fn relationship_path(
        &self,
        descriptor: &ResourceDescriptor,
        id: &str,
        relationship: &RelationshipDescriptor,
    ) -> String {
        format!(
            "{}/relationships/{}",
            self.resource_path(descriptor, id),
            relationship_segment(relationship)
        )
    }

    /// `links.related` of a relationship entry
    fn related_path(
        &self,
        descriptor: &ResourceDescriptor,
        id: &str,
        relationship: &RelationshipDescriptor,
    ) -> String {
        format!(
            "{}/{}",
            self.resource_path(descriptor, id),
            relationship_segment(relationship)
        )
    }
}

fn relationship_segment(relationship: &RelationshipDescriptor) -> &str {
    relationship
        .url_path
        .as_deref()
        .unwrap_or(&relationship.wire_name)
}

/// Default path builder: base path plus the route template with parameter
/// segments (`{id}`) stripped.
#[derive(Debug, Clone)]
pub struct RoutePathBuilder {
    route: RouteInfo,
}

impl RoutePathBuilder {
    pub fn new(route: RouteInfo) -> Self {
        Self { route }
    }
}

impl PathBuilder for RoutePathBuilder {
    fn collection_path(&self, _descriptor: &ResourceDescriptor) -> String {
        let base = self.route.base_path.trim_end_matches('/');
        let fixed: Vec<&str> = self
            .route
            .template
            .split('/')
            .filter(|segment| !segment.is_empty() && !segment.contains('{'))
            .collect();
        format!("{}/{}", base, fixed.join("/"))
    }
}
