use std::collections::BTreeMap;

use crate::database::models::{Article, Category, User};

use super::include::{self, IncludeSet, InvalidInclude};
use super::resource::JsonApiResource;

/// Allow-list of includable relations per resource type.
///
/// Built from each resource's `RELATIONSHIPS` so validation and
/// serialization read the same declaration.
#[derive(Debug, Clone)]
pub struct RelationshipRegistry {
    allowed: BTreeMap<&'static str, &'static [&'static str]>,
}

impl Default for RelationshipRegistry {
    fn default() -> Self {
        Self::new()
            .register::<Article>()
            .register::<Category>()
            .register::<User>()
    }
}

impl RelationshipRegistry {
    pub fn new() -> Self {
        Self { allowed: BTreeMap::new() }
    }

    pub fn register<T: JsonApiResource>(mut self) -> Self {
        self.allowed.insert(T::TYPE, T::RELATIONSHIPS);
        self
    }

    /// Unregistered types allow nothing
    pub fn allowed(&self, resource_type: &str) -> &'static [&'static str] {
        self.allowed.get(resource_type).copied().unwrap_or(&[])
    }

    pub fn resolve(&self, resource_type: &str, raw: Option<&str>) -> Result<IncludeSet, InvalidInclude> {
        include::resolve(raw, resource_type, self.allowed(resource_type))
    }
}
