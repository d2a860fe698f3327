use axum::{
    extract::Request,
    http::{header, HeaderMap, Method},
    middleware::Next,
    response::Response,
};

use crate::error::ApiError;
use crate::jsonapi::MEDIA_TYPE;

/// Content negotiation for JSON:API routes.
///
/// 406 when the client's `Accept` rules out `application/vnd.api+json`;
/// 415 when a POST/PATCH body is not declared as JSON:API.
pub async fn json_api_headers_middleware(request: Request, next: Next) -> Result<Response, ApiError> {
    if !accepts_json_api(request.headers()) {
        return Err(ApiError::NotAcceptable(format!(
            "The Accept header must allow '{}'.",
            MEDIA_TYPE
        )));
    }

    let has_body = matches!(*request.method(), Method::POST | Method::PATCH);
    if has_body && !is_json_api_content(request.headers()) {
        return Err(ApiError::UnsupportedMediaType(format!(
            "The Content-Type header must be '{}'.",
            MEDIA_TYPE
        )));
    }

    Ok(next.run(request).await)
}

/// Missing header, `*/*` and `application/*` count as accepting
fn accepts_json_api(headers: &HeaderMap) -> bool {
    let Some(value) = headers.get(header::ACCEPT) else {
        return true;
    };
    let Ok(accept) = value.to_str() else {
        return false;
    };

    accept
        .split(',')
        .map(|item| item.split(';').next().unwrap_or_default().trim())
        .any(|range| range == MEDIA_TYPE || range == "*/*" || range == "application/*")
}

fn is_json_api_content(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.split(';').next().unwrap_or_default().trim() == MEDIA_TYPE)
        .unwrap_or(false)
}
