//! Inbound document deserialization: validate top-level shape, then flatten.
//!
//! A valid top-level document contains at least one of `data`, `errors`,
//! `meta`; never both `data` and `errors`; `included` only alongside
//! `data`; and no member outside the fixed allowed set. Every violation
//! raises the same generic client error. Flattening lifts `id` and each
//! attribute up to sibling fields (names converted back to the declared
//! convention) and recursively flattens relationship linkage, producing a
//! structure directly convertible into the target domain type.

use serde_json::{Map, Value};
use tracing::debug;

use jsonapi_document::{DescriptorRegistry, ResourceDescriptor, naming};

use crate::error::DeserializeError;

const ALLOWED_MEMBERS: &[&str] = &["data", "errors", "meta", "jsonapi", "links", "included"];

/// One flattened resource object
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlatResource {
    pub id: Option<String>,
    pub resource_type: Option<String>,
    /// Declared-name keyed fields: attributes plus flattened relationships
    pub fields: Map<String, Value>,
}

impl FlatResource {
    /// The flattened form as a JSON object, id included under the declared
    /// id field name, ready to materialize into the domain type.
    pub fn to_value(&self, id_field: &str) -> Value {
        let mut object = self.fields.clone();
        if let Some(id) = &self.id {
            object.insert(id_field.to_string(), Value::String(id.clone()));
        }
        Value::Object(object)
    }
}

/// Flattened primary data
#[derive(Debug, Clone, PartialEq)]
pub enum Flattened {
    None,
    One(FlatResource),
    Many(Vec<FlatResource>),
}

/// Validate and flatten a parsed JSON:API request document
pub fn deserialize(
    document: &Value,
    registry: &DescriptorRegistry,
) -> Result<Flattened, DeserializeError> {
    let members = document.as_object().ok_or(DeserializeError::InvalidContent)?;

    if members.keys().any(|k| !ALLOWED_MEMBERS.contains(&k.as_str())) {
        return Err(DeserializeError::InvalidContent);
    }
    let has_data = members.contains_key("data");
    let has_errors = members.contains_key("errors");
    let has_meta = members.contains_key("meta");
    if !(has_data || has_errors || has_meta) {
        return Err(DeserializeError::InvalidContent);
    }
    if has_data && has_errors {
        return Err(DeserializeError::InvalidContent);
    }
    if members.contains_key("included") && !has_data {
        return Err(DeserializeError::InvalidContent);
    }

    let Some(data) = members.get("data") else {
        return Ok(Flattened::None);
    };
    match data {
        Value::Null => Ok(Flattened::None),
        Value::Object(resource) => Ok(Flattened::One(flatten_resource(resource, registry)?)),
        Value::Array(resources) => {
            let flat = resources
                .iter()
                .map(|r| {
                    r.as_object()
                        .ok_or(DeserializeError::InvalidContent)
                        .and_then(|r| flatten_resource(r, registry))
                })
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Flattened::Many(flat))
        }
        _ => Err(DeserializeError::InvalidContent),
    }
}

fn flatten_resource(
    resource: &Map<String, Value>,
    registry: &DescriptorRegistry,
) -> Result<FlatResource, DeserializeError> {
    let resource_type = resource
        .get("type")
        .and_then(Value::as_str)
        .map(str::to_string);
    let descriptor = resource_type
        .as_deref()
        .and_then(|t| registry.get(t))
        .map(|d| d.as_ref());

    let id = resource.get("id").map(|v| match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    });

    let mut fields = Map::new();

    if let Some(attributes) = resource.get("attributes") {
        let attributes = attributes
            .as_object()
            .ok_or(DeserializeError::InvalidContent)?;
        for (wire_name, value) in attributes {
            fields.insert(declared_name(descriptor, wire_name), value.clone());
        }
    }

    if let Some(relationships) = resource.get("relationships") {
        let relationships = relationships
            .as_object()
            .ok_or(DeserializeError::InvalidContent)?;
        for (wire_name, entry) in relationships {
            let data = entry
                .as_object()
                .ok_or(DeserializeError::InvalidContent)?
                .get("data");
            let flattened = match data {
                None | Some(Value::Null) => Value::Null,
                Some(Value::Object(identifier)) => flatten_identifier(identifier, registry)?,
                Some(Value::Array(identifiers)) => Value::Array(
                    identifiers
                        .iter()
                        .map(|i| {
                            i.as_object()
                                .ok_or(DeserializeError::InvalidContent)
                                .and_then(|i| flatten_identifier(i, registry))
                        })
                        .collect::<Result<Vec<_>, _>>()?,
                ),
                Some(_) => return Err(DeserializeError::InvalidContent),
            };
            fields.insert(relationship_field(descriptor, wire_name), flattened);
        }
    }

    debug!(resource_type = ?resource_type, "flattened resource object");
    Ok(FlatResource { id, resource_type, fields })
}

/// A resource identifier flattens the same way a resource object does: the
/// id lifted to the related type's declared id field.
fn flatten_identifier(
    identifier: &Map<String, Value>,
    registry: &DescriptorRegistry,
) -> Result<Value, DeserializeError> {
    let flat = flatten_resource(identifier, registry)?;
    let id_field = flat
        .resource_type
        .as_deref()
        .and_then(|t| registry.get(t))
        .map(|d| d.id_field().to_string())
        .unwrap_or_else(|| "Id".to_string());
    Ok(flat.to_value(&id_field))
}

fn declared_name(descriptor: Option<&ResourceDescriptor>, wire_name: &str) -> String {
    descriptor
        .and_then(|d| d.attribute(wire_name))
        .map(|a| a.field.clone())
        .unwrap_or_else(|| naming::to_pascal(wire_name))
}

fn relationship_field(descriptor: Option<&ResourceDescriptor>, wire_name: &str) -> String {
    descriptor
        .and_then(|d| d.relationship(wire_name))
        .map(|r| r.field.clone())
        .unwrap_or_else(|| naming::to_pascal(wire_name))
}
