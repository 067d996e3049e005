//! JSON:API wire document types.
//!
//! These structs serialize 1:1 into the shapes defined by the JSON:API
//! specification. They carry no behavior beyond construction helpers; the
//! serializer in the engine crate is responsible for filling them in.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::error::ErrorObject;

/// Top-level JSON:API document
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Document {
    #[serde(
        default,
        deserialize_with = "nullable_primary_data",
        skip_serializing_if = "Option::is_none"
    )]
    pub data: Option<PrimaryData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<ErrorObject>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub included: Option<Vec<ResourceObject>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub links: Option<TopLevelLinks>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<Map<String, Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jsonapi: Option<JsonApiObject>,
}

impl Document {
    pub fn with_meta(mut self, meta: Map<String, Value>) -> Self {
        self.meta = Some(meta);
        self
    }
}

/// Primary `data`: a collection, a single resource, or null
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PrimaryData {
    Many(Vec<ResourceObject>),
    One(ResourceObject),
    Null,
}

/// A present-but-null `data` member deserializes to `Some(PrimaryData::Null)`;
/// plain `Option` would swallow the null and lose the absent-vs-null
/// distinction on the inbound side.
fn nullable_primary_data<'de, D>(deserializer: D) -> Result<Option<PrimaryData>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(Some(PrimaryData::Null));
    }
    serde_json::from_value(value)
        .map(Some)
        .map_err(serde::de::Error::custom)
}

/// One resource object under `data` or `included`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceObject {
    pub id: String,
    #[serde(rename = "type")]
    pub resource_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attributes: Option<Map<String, Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relationships: Option<BTreeMap<String, Relationship>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub links: Option<ResourceLinks>,
}

impl ResourceObject {
    pub fn new(id: impl Into<String>, resource_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            resource_type: resource_type.into(),
            attributes: None,
            relationships: None,
            links: None,
        }
    }

    /// The `(type, id)` identity of this resource object
    pub fn identity(&self) -> (String, String) {
        (self.resource_type.clone(), self.id.clone())
    }
}

/// Resource identifier: `{ "type": ..., "id": ... }`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResourceIdentifier {
    pub id: String,
    #[serde(rename = "type")]
    pub resource_type: String,
}

impl ResourceIdentifier {
    pub fn new(id: impl Into<String>, resource_type: impl Into<String>) -> Self {
        Self { id: id.into(), resource_type: resource_type.into() }
    }
}

/// One entry under a resource object's `relationships`
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Relationship {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub links: Option<RelationshipLinks>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<RelationshipData>,
}

/// Relationship linkage: identifiers only, never full objects
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RelationshipData {
    Many(Vec<ResourceIdentifier>),
    One(ResourceIdentifier),
    Null,
}

/// Links on a resource object
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ResourceLinks {
    #[serde(rename = "self", skip_serializing_if = "Option::is_none")]
    pub self_link: Option<String>,
}

/// Links on a relationship entry
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RelationshipLinks {
    #[serde(rename = "self", skip_serializing_if = "Option::is_none")]
    pub self_link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub related: Option<String>,
}

/// Top-level document links, including pagination
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TopLevelLinks {
    #[serde(rename = "self", skip_serializing_if = "Option::is_none")]
    pub self_link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev: Option<String>,
}

/// The `jsonapi` member
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonApiObject {
    pub version: String,
}

impl Default for JsonApiObject {
    fn default() -> Self {
        Self { version: crate::JSONAPI_VERSION.to_string() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_primary_data_shapes() {
        let one = PrimaryData::One(ResourceObject::new("1", "people"));
        assert_eq!(
            serde_json::to_value(&one).unwrap(),
            json!({"id": "1", "type": "people"})
        );

        let null = PrimaryData::Null;
        assert_eq!(serde_json::to_value(&null).unwrap(), Value::Null);

        let many = PrimaryData::Many(vec![]);
        assert_eq!(serde_json::to_value(&many).unwrap(), json!([]));
    }

    #[test]
    fn test_relationship_serialization() {
        let rel = Relationship {
            links: None,
            data: Some(RelationshipData::One(ResourceIdentifier::new("7", "people"))),
        };
        assert_eq!(
            serde_json::to_value(&rel).unwrap(),
            json!({"data": {"id": "7", "type": "people"}})
        );

        let empty = Relationship { links: None, data: Some(RelationshipData::Null) };
        assert_eq!(serde_json::to_value(&empty).unwrap(), json!({"data": null}));
    }

    #[test]
    fn test_document_skips_absent_members() {
        let doc = Document { data: Some(PrimaryData::Null), ..Default::default() };
        assert_eq!(serde_json::to_value(&doc).unwrap(), json!({"data": null}));
    }

    #[test]
    fn test_document_round_trip() {
        let value = json!({
            "data": [{"id": "1", "type": "people", "attributes": {"age": 30}}],
            "links": {"first": "?page[number]=0"}
        });
        let doc: Document = serde_json::from_value(value.clone()).unwrap();
        assert_eq!(serde_json::to_value(&doc).unwrap(), value);
    }
}
