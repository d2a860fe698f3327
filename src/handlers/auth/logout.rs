// handlers/auth/logout.rs - POST /api/v1/logout handler

use axum::{extract::State, http::StatusCode, Extension};

use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::state::AppState;

/// POST /api/v1/logout - Revoke the token used for this request
pub async fn logout_post(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<StatusCode, ApiError> {
    state.store.delete_token(auth.token.id).await?;
    tracing::info!("User {} revoked token {}", auth.id(), auth.token.id);
    Ok(StatusCode::NO_CONTENT)
}
