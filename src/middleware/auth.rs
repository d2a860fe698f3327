use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use chrono::Utc;

use crate::auth::token;
use crate::database::models::{PersonalAccessToken, User};
use crate::database::Store;
use crate::error::ApiError;
use crate::state::AppState;

/// Authenticated user context resolved from a personal access token
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub user: User,
    pub token: PersonalAccessToken,
}

impl AuthUser {
    pub fn id(&self) -> i64 {
        self.user.id
    }

    /// 403 unless the token carries `ability`
    pub fn authorize(&self, ability: &str) -> Result<(), ApiError> {
        if self.token.cant(ability) {
            tracing::warn!("User {} lacks ability '{}'", self.user.id, ability);
            return Err(ApiError::forbidden());
        }
        Ok(())
    }
}

/// Token authentication middleware: rejects the request with 401 unless a
/// valid bearer token is presented, and injects `AuthUser` otherwise
pub async fn token_auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let plain_text = extract_bearer_from_headers(request.headers()).map_err(|msg| {
        tracing::debug!("Authentication failed: {}", msg);
        ApiError::unauthenticated()
    })?;

    let auth_user = resolve(state.store.as_ref(), plain_text)
        .await?
        .ok_or_else(ApiError::unauthenticated)?;

    tracing::debug!(
        "Authenticated user {} with token {} ({})",
        auth_user.user.id,
        auth_user.token.id,
        auth_user.token.name
    );

    request.extensions_mut().insert(auth_user);
    Ok(next.run(request).await)
}

/// Guest-only routes: a request that already authenticates gets 204 and
/// never reaches the handler, so a client holds a single token at a time
pub async fn guest_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if let Ok(plain_text) = extract_bearer_from_headers(request.headers()) {
        if let Some(auth_user) = resolve(state.store.as_ref(), plain_text).await? {
            tracing::debug!("User {} is already authenticated", auth_user.user.id);
            return Ok(StatusCode::NO_CONTENT.into_response());
        }
    }
    Ok(next.run(request).await)
}

/// Find the token and its owner, recording the use
async fn resolve(store: &dyn Store, plain_text: &str) -> Result<Option<AuthUser>, ApiError> {
    let Some(token) = token::find(store, plain_text).await? else {
        return Ok(None);
    };
    let Some(user) = store.find_user(token.user_id).await? else {
        return Ok(None);
    };

    store.touch_token(token.id, Utc::now()).await?;
    Ok(Some(AuthUser { user, token }))
}

/// Extract the token from the Authorization header
fn extract_bearer_from_headers(headers: &HeaderMap) -> Result<&str, &'static str> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .ok_or("Missing Authorization header")?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| "Invalid Authorization header format")?;

    match auth_str.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(token.trim()),
        Some(_) => Err("Empty bearer token"),
        None => Err("Authorization header must use Bearer token format"),
    }
}
