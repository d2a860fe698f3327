// handlers/auth/login.rs - POST /api/v1/login handler

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    Json,
};
use serde::Deserialize;

use crate::auth::{token, verify_password_blocking};
use crate::error::ApiError;
use crate::handlers::utils::parse_body;
use crate::services::{FieldErrors, Validator};
use crate::state::AppState;

use super::TokenResponse;

pub const BAD_CREDENTIALS: &str = "These credentials do not match our records.";

#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub device_name: Option<String>,
}

/// POST /api/v1/login - Authenticate and receive a personal access token
///
/// Expected Input:
/// ```json
/// { "email": "user@example.com", "password": "secret", "device_name": "laptop" }
/// ```
///
/// Expected Output:
/// ```json
/// { "plain-text-token": "1|0123456789abcdef0123456789abcdef01234567" }
/// ```
pub async fn login_post(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<TokenResponse>, ApiError> {
    let request: LoginRequest = parse_body(&body?)?;

    let mut v = Validator::new();
    let email = v.required("email", request.email.as_deref());
    if let Some(email) = email {
        v.email("email", email);
    }
    let password = v.required("password", request.password.as_deref());
    let device_name = v.required("device_name", request.device_name.as_deref());
    v.finish().map_err(ApiError::validation_error)?;

    let (Some(email), Some(password), Some(device_name)) = (email, password, device_name) else {
        return Err(ApiError::internal_server_error("Validated login request is incomplete"));
    };

    let user = match state.store.find_user_by_email(email).await? {
        Some(user) => {
            let matches = verify_password_blocking(password.to_string(), user.password.clone()).await?;
            matches.then_some(user)
        }
        None => None,
    };
    let Some(user) = user else {
        tracing::warn!("Rejected login for '{}'", email);
        let mut errors = FieldErrors::default();
        errors.add("email", BAD_CREDENTIALS);
        return Err(ApiError::validation_error(errors));
    };

    let issued = token::issue(state.store.as_ref(), &user, device_name).await?;
    tracing::info!("User {} logged in from '{}'", user.id, device_name);

    Ok(Json(TokenResponse {
        plain_text_token: issued.plain_text,
    }))
}
