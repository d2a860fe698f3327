use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Wildcard ability granting everything
pub const ANY_ABILITY: &str = "*";

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PersonalAccessToken {
    pub id: i64,
    pub user_id: i64,
    /// Device name supplied at login
    pub name: String,
    /// sha256 hex digest of the secret half of the plain text token
    #[serde(skip_serializing)]
    pub token: String,
    pub abilities: Vec<String>,
    pub last_used_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl PersonalAccessToken {
    pub fn can(&self, ability: &str) -> bool {
        self.abilities.iter().any(|a| a == ability || a == ANY_ABILITY)
    }

    pub fn cant(&self, ability: &str) -> bool {
        !self.can(ability)
    }
}

#[derive(Debug, Clone)]
pub struct NewToken {
    pub user_id: i64,
    pub name: String,
    pub token: String,
    pub abilities: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token_with(abilities: &[&str]) -> PersonalAccessToken {
        PersonalAccessToken {
            id: 1,
            user_id: 1,
            name: "device".into(),
            token: String::new(),
            abilities: abilities.iter().map(|s| s.to_string()).collect(),
            last_used_at: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn can_checks_listed_abilities() {
        let token = token_with(&["articles:create", "articles:update"]);
        assert!(token.can("articles:create"));
        assert!(token.can("articles:update"));
        assert!(token.cant("articles:delete"));
    }

    #[test]
    fn wildcard_grants_everything() {
        let token = token_with(&["*"]);
        assert!(token.can("articles:delete"));
    }

    #[test]
    fn empty_abilities_grant_nothing() {
        assert!(token_with(&[]).cant("articles:create"));
    }
}
