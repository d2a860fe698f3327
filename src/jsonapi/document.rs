use serde::Serialize;

use super::include::IncludeSet;
use super::resource::{DocumentError, JsonApiResource, Links, ResourceIdentifier, ResourceObject};

/// Primary data of a document
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PrimaryData {
    One(ResourceObject),
    Many(Vec<ResourceObject>),
    Identifier(ResourceIdentifier),
}

/// Top-level JSON:API envelope.
///
/// `included` is left out entirely when nothing was included.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document {
    pub data: PrimaryData,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub included: Vec<ResourceObject>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub links: Option<Links>,
}

impl Document {
    /// Single resource with its requested relations appended to `included`
    pub fn resource<T: JsonApiResource>(entity: &T, includes: &IncludeSet) -> Result<Self, DocumentError> {
        Ok(Self {
            data: PrimaryData::One(entity.to_resource()),
            included: included_for(entity, includes)?,
            links: None,
        })
    }

    /// Collection in input order. `included` is the concatenation of every
    /// item's included resources; shared relations are repeated, not merged.
    pub fn collection<T: JsonApiResource>(
        entities: &[T],
        includes: &IncludeSet,
        self_link: impl Into<String>,
    ) -> Result<Self, DocumentError> {
        let mut data = Vec::with_capacity(entities.len());
        let mut included = Vec::new();
        for entity in entities {
            data.push(entity.to_resource());
            included.extend(included_for(entity, includes)?);
        }

        Ok(Self {
            data: PrimaryData::Many(data),
            included,
            links: Some(Links::to_self(self_link)),
        })
    }

    /// Resource linkage for a `/relationships/<name>` endpoint
    pub fn identifier<T: JsonApiResource>(entity: &T, links: Links) -> Self {
        Self {
            data: PrimaryData::Identifier(entity.identifier()),
            included: Vec::new(),
            links: Some(links),
        }
    }
}

fn included_for<T: JsonApiResource>(entity: &T, includes: &IncludeSet) -> Result<Vec<ResourceObject>, DocumentError> {
    let mut included = Vec::new();
    for relation in includes.iter() {
        included.extend(entity.related(relation)?);
    }
    Ok(included)
}
