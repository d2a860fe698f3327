//! JSON:API serialization with validated relationship inclusion.
//!
//! A request's `include` parameter is checked against the
//! [`RelationshipRegistry`] first; only then are relations loaded and the
//! [`Document`] assembled from [`JsonApiResource`] implementations.

pub mod document;
pub mod include;
pub mod registry;
pub mod resource;
pub mod resources;

pub use document::{Document, PrimaryData};
pub use include::{IncludeSet, InvalidInclude};
pub use registry::RelationshipRegistry;
pub use resource::{DocumentError, JsonApiResource, Links, ResourceIdentifier, ResourceObject};

/// Path prefix of every JSON:API route
pub const API_PREFIX: &str = "/api/v1";

pub const MEDIA_TYPE: &str = "application/vnd.api+json";
