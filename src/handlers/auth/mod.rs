// handlers/auth/mod.rs - Token acquisition and revocation
//
// Plain JSON endpoints (not JSON:API). Login and register sit behind the
// guest gate, logout behind token authentication.

use serde::Serialize;

pub mod login;    // POST /api/v1/login - exchange credentials for a token
pub mod logout;   // POST /api/v1/logout - revoke the presented token
pub mod register; // POST /api/v1/register - create an account and a token

pub use login::login_post;
pub use logout::logout_post;
pub use register::register_post;

/// Body returned when a token is issued
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    #[serde(rename = "plain-text-token")]
    pub plain_text_token: String,
}
