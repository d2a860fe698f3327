// handlers/mod.rs - HTTP handlers
//
// Resource handlers speak JSON:API; the auth handlers speak plain JSON.
// Which routes need a token is decided by the router in lib.rs.

pub mod articles;
pub mod auth;
pub mod authors;
pub mod categories;
pub mod system;
pub mod utils;

pub use utils::IncludeQuery;
