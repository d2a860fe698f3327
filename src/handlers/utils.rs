use axum::body::Bytes;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::error::ApiError;

#[derive(Debug, Default, Deserialize)]
pub struct IncludeQuery {
    /// Comma-separated relation names, e.g. `include=category,author`
    pub include: Option<String>,
}

/// Parse a request body; an empty body reads as `{}` so that missing fields
/// surface as validation errors instead of a parse failure
pub fn parse_body<T: DeserializeOwned + Default>(body: &Bytes) -> Result<T, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(body).map_err(|e| {
        tracing::debug!("Rejected request body: {}", e);
        ApiError::bad_request(format!("Malformed JSON body: {}", e))
    })
}

/// The `data` member of a JSON:API write document, checked against the
/// endpoint's resource type
#[derive(Debug)]
pub struct WriteDocument {
    pub data: Value,
}

impl WriteDocument {
    pub fn parse(body: &Bytes, resource_type: &str) -> Result<Self, ApiError> {
        let document: Value = serde_json::from_slice(body).map_err(|e| {
            tracing::debug!("Rejected request document: {}", e);
            ApiError::bad_request(format!("Malformed JSON body: {}", e))
        })?;

        let data = match document.get("data") {
            Some(data @ Value::Object(_)) => data.clone(),
            _ => return Err(ApiError::bad_request("The request document must contain a 'data' object.")),
        };

        match data.get("type").and_then(Value::as_str) {
            Some(t) if t == resource_type => Ok(Self { data }),
            Some(t) => Err(ApiError::conflict(format!(
                "The resource type '{}' does not match the '{}' endpoint.",
                t, resource_type
            ))),
            None => Err(ApiError::bad_request("The 'data' object must contain a 'type' member.")),
        }
    }

    pub fn id(&self) -> Option<&str> {
        self.data.get("id").and_then(Value::as_str)
    }

    /// A string attribute; non-string values read as absent
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.data.get("attributes")?.get(name)?.as_str()
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.data.get("attributes").and_then(|a| a.get(name)).is_some()
    }

    /// `relationships.<name>.data.id` of a to-one relationship
    pub fn relationship_id(&self, name: &str) -> Option<&str> {
        self.data.get("relationships")?.get(name)?.get("data")?.get("id")?.as_str()
    }

    pub fn has_relationship(&self, name: &str) -> bool {
        self.data.get("relationships").and_then(|r| r.get(name)).is_some()
    }
}
