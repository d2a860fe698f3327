// HTTP API Error Types
use axum::{
    extract::rejection::{BytesRejection, QueryRejection},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::{json, Value};

use crate::database::StoreError;
use crate::jsonapi::{DocumentError, InvalidInclude, MEDIA_TYPE};
use crate::services::FieldErrors;

/// Summary line Laravel-style validation bodies carry next to field errors
pub const VALIDATION_MESSAGE: &str = "The given data was invalid.";

/// HTTP API error with appropriate status codes and client-friendly messages
#[derive(Debug)]
pub enum ApiError {
    // 400 Bad Request
    BadRequest(String),

    // 401 Unauthorized
    Unauthenticated(String),

    // 403 Forbidden
    Forbidden(String),

    // 404 Not Found
    NotFound(String),

    // 406 Not Acceptable
    NotAcceptable(String),

    // 409 Conflict
    Conflict(String),

    // 413 Payload Too Large
    PayloadTooLarge(String),

    // 415 Unsupported Media Type
    UnsupportedMediaType(String),

    // 422 on plain JSON endpoints: `{message, errors: {field: [..]}}`
    ValidationError(FieldErrors),

    // 422 on JSON:API endpoints: one error object per failure with a source pointer
    InvalidDocument(Vec<PointerError>),

    // 500 Internal Server Error
    InternalServerError(String),

    // 503 Service Unavailable
    ServiceUnavailable(String),
}

/// A validation failure located inside a JSON:API request document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PointerError {
    pub pointer: String,
    pub detail: String,
}

/// JSON:API error object
#[derive(Debug, Serialize)]
struct ErrorObject<'a> {
    title: &'a str,
    detail: &'a str,
    status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    source: Option<Value>,
}

impl ApiError {
    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::BadRequest(_) => 400,
            ApiError::Unauthenticated(_) => 401,
            ApiError::Forbidden(_) => 403,
            ApiError::NotFound(_) => 404,
            ApiError::NotAcceptable(_) => 406,
            ApiError::Conflict(_) => 409,
            ApiError::PayloadTooLarge(_) => 413,
            ApiError::UnsupportedMediaType(_) => 415,
            ApiError::ValidationError(_) => 422,
            ApiError::InvalidDocument(_) => 422,
            ApiError::InternalServerError(_) => 500,
            ApiError::ServiceUnavailable(_) => 503,
        }
    }

    /// Short, fixed title of the error class
    pub fn title(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "Bad Request",
            ApiError::Unauthenticated(_) => "Unauthenticated",
            ApiError::Forbidden(_) => "Forbidden",
            ApiError::NotFound(_) => "Not Found",
            ApiError::NotAcceptable(_) => "Not Acceptable",
            ApiError::Conflict(_) => "Conflict",
            ApiError::PayloadTooLarge(_) => "Payload Too Large",
            ApiError::UnsupportedMediaType(_) => "Unsupported Media Type",
            ApiError::ValidationError(_) | ApiError::InvalidDocument(_) => "Unprocessable Entity",
            ApiError::InternalServerError(_) => "Internal Server Error",
            ApiError::ServiceUnavailable(_) => "Service Unavailable",
        }
    }

    /// Get client-safe error message
    pub fn message(&self) -> &str {
        match self {
            ApiError::BadRequest(msg) => msg,
            ApiError::Unauthenticated(msg) => msg,
            ApiError::Forbidden(msg) => msg,
            ApiError::NotFound(msg) => msg,
            ApiError::NotAcceptable(msg) => msg,
            ApiError::Conflict(msg) => msg,
            ApiError::PayloadTooLarge(msg) => msg,
            ApiError::UnsupportedMediaType(msg) => msg,
            ApiError::ValidationError(errors) => errors.first_message().unwrap_or(VALIDATION_MESSAGE),
            ApiError::InvalidDocument(errors) => {
                errors.first().map(|e| e.detail.as_str()).unwrap_or(VALIDATION_MESSAGE)
            }
            ApiError::InternalServerError(msg) => msg,
            ApiError::ServiceUnavailable(msg) => msg,
        }
    }

    /// Convert to JSON response body
    pub fn to_json(&self) -> Value {
        let status = self.status_code().to_string();
        match self {
            ApiError::ValidationError(errors) => json!({
                "message": VALIDATION_MESSAGE,
                "errors": errors.as_map(),
            }),
            ApiError::InvalidDocument(errors) => {
                let objects: Vec<ErrorObject> = errors
                    .iter()
                    .map(|e| ErrorObject {
                        title: self.title(),
                        detail: &e.detail,
                        status: status.clone(),
                        source: Some(json!({ "pointer": e.pointer })),
                    })
                    .collect();
                json!({ "errors": objects })
            }
            _ => {
                let object = ErrorObject {
                    title: self.title(),
                    detail: self.message(),
                    status,
                    source: None,
                };
                json!({ "errors": [object] })
            }
        }
    }

    /// Plain JSON validation bodies are the only non-JSON:API error shape
    fn content_type(&self) -> &'static str {
        match self {
            ApiError::ValidationError(_) => "application/json",
            _ => MEDIA_TYPE,
        }
    }
}

// Static constructor methods
impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn unauthenticated() -> Self {
        ApiError::Unauthenticated("This action requires authentication.".to_string())
    }

    pub fn forbidden() -> Self {
        ApiError::Forbidden("This action is unauthorized.".to_string())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    /// Route-model binding miss
    pub fn model_not_found(resource_type: &str, route_key: &str) -> Self {
        ApiError::NotFound(format!(
            "No records found for the id '{}' in the '{}' resource.",
            route_key, resource_type
        ))
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        ApiError::Conflict(message.into())
    }

    pub fn payload_too_large() -> Self {
        ApiError::PayloadTooLarge("The request body exceeds the maximum allowed size.".to_string())
    }

    pub fn validation_error(errors: FieldErrors) -> Self {
        ApiError::ValidationError(errors)
    }

    /// Field errors located in a request document; `to_pointer` maps a field
    /// name to its JSON pointer
    pub fn invalid_document(errors: FieldErrors, to_pointer: impl Fn(&str) -> String) -> Self {
        let errors = errors
            .iter()
            .flat_map(|(field, messages)| {
                let pointer = to_pointer(field);
                messages.iter().map(move |detail| PointerError {
                    pointer: pointer.clone(),
                    detail: detail.clone(),
                })
            })
            .collect();
        ApiError::InvalidDocument(errors)
    }

    pub fn internal_server_error(message: impl Into<String>) -> Self {
        ApiError::InternalServerError(message.into())
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        ApiError::ServiceUnavailable(message.into())
    }
}

// Convert other error types to ApiError
impl From<InvalidInclude> for ApiError {
    fn from(err: InvalidInclude) -> Self {
        ApiError::bad_request(err.to_string())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::bad_request(rejection.body_text())
    }
}

impl From<BytesRejection> for ApiError {
    fn from(rejection: BytesRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            tracing::debug!("Rejected request body: {}", rejection.body_text());
            return ApiError::payload_too_large();
        }
        ApiError::bad_request(rejection.body_text())
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(msg) => {
                // Handlers resolve route keys themselves; reaching this means a dangling reference
                tracing::error!("Store lookup failed: {}", msg);
                ApiError::internal_server_error("An error occurred while processing your request")
            }
            StoreError::UniqueViolation(field) => {
                ApiError::conflict(format!("A record with the same {} already exists.", field))
            }
            StoreError::Migration(msg) => {
                tracing::error!("Migration error: {}", msg);
                ApiError::service_unavailable("Service is being updated, please try again later")
            }
            StoreError::Sqlx(sqlx_err) => {
                // Log the real error but return generic message
                tracing::error!("SQLx error: {}", sqlx_err);
                ApiError::internal_server_error("Database error occurred")
            }
        }
    }
}

impl From<DocumentError> for ApiError {
    fn from(err: DocumentError) -> Self {
        tracing::error!("Failed to build JSON:API document: {}", err);
        ApiError::internal_server_error("Failed to format response")
    }
}

impl From<crate::auth::PasswordError> for ApiError {
    fn from(err: crate::auth::PasswordError) -> Self {
        tracing::error!("{}", err);
        ApiError::internal_server_error("An error occurred while processing your request")
    }
}

// Standard error trait implementations
impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

// Automatic HTTP response conversion for Axum
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let mut response = (status, Json(self.to_json())).into_response();
        response
            .headers_mut()
            .insert(header::CONTENT_TYPE, HeaderValue::from_static(self.content_type()));
        response
    }
}
