pub mod auth;
pub mod json_api;
pub mod response;

pub use auth::{guest_middleware, token_auth_middleware, AuthUser};
pub use json_api::json_api_headers_middleware;
pub use response::{ApiResponse, ApiResult};
