use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Named permission such as `articles:create`. Granted permissions become
/// the abilities of every token issued to the user.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Permission {
    pub id: i64,
    pub name: String,
}
