use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

use super::API_PREFIX;

/// Attribute name paired with the accessor producing its value
pub type Field<T> = (&'static str, fn(&T) -> Value);

#[derive(Debug, Error)]
pub enum DocumentError {
    /// Requested relation was allowed but the loader never attached it
    #[error("Relation '{relation}' of '{resource_type}' was requested but not loaded")]
    RelationNotLoaded {
        resource_type: &'static str,
        relation: String,
    },

    #[error("Resource '{resource_type}' has no relation named '{relation}'")]
    UnknownRelation {
        resource_type: &'static str,
        relation: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Links {
    #[serde(rename = "self")]
    pub self_link: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub related: Option<String>,
}

impl Links {
    pub fn to_self(self_link: impl Into<String>) -> Self {
        Self { self_link: self_link.into(), related: None }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Relationship {
    pub links: Links,
}

/// `{type, id}` pair identifying a resource within a document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceIdentifier {
    #[serde(rename = "type")]
    pub resource_type: &'static str,
    pub id: String,
}

/// One serialized resource
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResourceObject {
    #[serde(rename = "type")]
    pub resource_type: &'static str,
    pub id: String,
    pub attributes: Map<String, Value>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub relationships: BTreeMap<&'static str, Relationship>,
    pub links: Links,
}

/// Capability shared by every entity exposed over the API.
///
/// Implementors declare their type name, the attribute mapping and the
/// relations clients may include; everything else is derived.
pub trait JsonApiResource: Sized + 'static {
    const TYPE: &'static str;

    /// Relations that may be requested via `include`
    const RELATIONSHIPS: &'static [&'static str] = &[];

    fn fields() -> &'static [Field<Self>];

    /// External identifier, not necessarily the storage key
    fn route_key(&self) -> String;

    /// Serialized form of an already-loaded relation
    fn related(&self, relation: &str) -> Result<Vec<ResourceObject>, DocumentError> {
        Err(DocumentError::UnknownRelation {
            resource_type: Self::TYPE,
            relation: relation.to_string(),
        })
    }

    fn self_link(&self) -> String {
        format!("{}/{}/{}", API_PREFIX, Self::TYPE, self.route_key())
    }

    fn attributes(&self) -> Map<String, Value> {
        Self::fields()
            .iter()
            .map(|(name, accessor)| (name.to_string(), accessor(self)))
            .collect()
    }

    fn identifier(&self) -> ResourceIdentifier {
        ResourceIdentifier {
            resource_type: Self::TYPE,
            id: self.route_key(),
        }
    }

    fn to_resource(&self) -> ResourceObject {
        let self_link = self.self_link();
        let relationships = Self::RELATIONSHIPS
            .iter()
            .map(|relation| {
                let links = Links {
                    self_link: format!("{}/relationships/{}", self_link, relation),
                    related: Some(format!("{}/{}", self_link, relation)),
                };
                (*relation, Relationship { links })
            })
            .collect();

        ResourceObject {
            resource_type: Self::TYPE,
            id: self.route_key(),
            attributes: self.attributes(),
            relationships,
            links: Links::to_self(self_link),
        }
    }
}

/// Helper for `related` implementations: a loaded to-one relation or a defect
pub fn to_one<R: JsonApiResource>(
    owner_type: &'static str,
    relation: &str,
    loaded: Option<&R>,
) -> Result<Vec<ResourceObject>, DocumentError> {
    loaded
        .map(|r| vec![r.to_resource()])
        .ok_or_else(|| DocumentError::RelationNotLoaded {
            resource_type: owner_type,
            relation: relation.to_string(),
        })
}
