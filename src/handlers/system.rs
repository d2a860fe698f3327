// handlers/system.rs - Service info, health check and the JSON:API 404 fallback

use axum::{
    extract::State,
    http::{StatusCode, Uri},
    response::{IntoResponse, Json},
};
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::jsonapi::API_PREFIX;
use crate::state::AppState;

/// GET / - service description
pub async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "name": "Blog API",
        "version": version,
        "description": "JSON:API blog backend: articles, categories and authors",
        "endpoints": {
            "health": "/health (public)",
            "articles": format!("{}/articles[/:slug] (read public, write requires token)", API_PREFIX),
            "categories": format!("{}/categories[/:slug] (public)", API_PREFIX),
            "authors": format!("{}/authors[/:id] (public)", API_PREFIX),
            "auth": format!("{0}/login, {0}/register (guest), {0}/logout (token)", API_PREFIX),
        }
    }))
}

/// GET /health - 200 while the store answers, 503 otherwise
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.store.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "timestamp": now,
                "database": "ok"
            })),
        ),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "degraded",
                    "timestamp": now,
                    "database": "unavailable"
                })),
            )
        }
    }
}

/// Unknown routes
pub async fn fallback(uri: Uri) -> ApiError {
    ApiError::not_found(format!("The route '{}' could not be found.", uri.path()))
}
