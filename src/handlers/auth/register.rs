// handlers/auth/register.rs - POST /api/v1/register handler

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    Json,
};
use serde::Deserialize;

use crate::auth::{hash_password_blocking, token};
use crate::database::models::NewUser;
use crate::error::ApiError;
use crate::handlers::utils::parse_body;
use crate::services::Validator;
use crate::state::AppState;

use super::TokenResponse;

#[derive(Debug, Default, Deserialize)]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub password_confirmation: Option<String>,
    pub device_name: Option<String>,
}

/// POST /api/v1/register - Create an account and log it in
///
/// Accounts start without permissions, so the issued token carries no
/// abilities until some are granted.
pub async fn register_post(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<TokenResponse>, ApiError> {
    let request: RegisterRequest = parse_body(&body?)?;
    let store = state.store.as_ref();

    let mut v = Validator::new();
    let name = v.required("name", request.name.as_deref());
    let email = v.required("email", request.email.as_deref());
    if let Some(email) = email {
        if v.email("email", email) && store.find_user_by_email(email).await?.is_some() {
            v.unique_violation("email");
        }
    }
    let password = v.required("password", request.password.as_deref());
    if let Some(password) = password {
        v.confirmed("password", password, request.password_confirmation.as_deref());
    }
    let device_name = v.required("device_name", request.device_name.as_deref());
    v.finish().map_err(ApiError::validation_error)?;

    let (Some(name), Some(email), Some(password), Some(device_name)) = (name, email, password, device_name) else {
        return Err(ApiError::internal_server_error("Validated registration is incomplete"));
    };

    let hash = hash_password_blocking(password.to_string(), state.config.auth.bcrypt_cost).await?;
    let user = store
        .insert_user(NewUser {
            name: name.to_string(),
            email: email.to_string(),
            password: hash,
        })
        .await?;

    let issued = token::issue(store, &user, device_name).await?;
    tracing::info!("Registered user {} <{}>", user.id, user.email);

    Ok(Json(TokenResponse {
        plain_text_token: issued.plain_text,
    }))
}
