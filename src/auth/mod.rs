//! Personal access tokens and password hashing.

pub mod password;
pub mod token;

pub use password::{
    hash_password, hash_password_blocking, verify_password, verify_password_blocking, PasswordError,
};
pub use token::NewAccessToken;
