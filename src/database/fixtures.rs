//! YAML seed data: permissions, categories, users and articles.
//!
//! Articles reference their category by slug and their author by email.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use super::models::{NewArticle, NewCategory, NewUser};
use super::{Store, StoreError};
use crate::auth::{hash_password_blocking, PasswordError};

#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid fixture YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Fixture references unknown {kind} '{key}'")]
    UnknownReference { kind: &'static str, key: String },

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Password(#[from] PasswordError),
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Fixtures {
    pub permissions: Vec<String>,
    pub categories: Vec<CategoryFixture>,
    pub users: Vec<UserFixture>,
    pub articles: Vec<ArticleFixture>,
}

#[derive(Debug, Deserialize)]
pub struct CategoryFixture {
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Deserialize)]
pub struct UserFixture {
    pub name: String,
    pub email: String,
    /// Plain text; hashed on load
    pub password: String,
    #[serde(default)]
    pub permissions: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct ArticleFixture {
    pub title: String,
    pub slug: String,
    pub content: String,
    /// Category slug
    pub category: String,
    /// Author email
    pub author: String,
}

/// Row counts written by `load`
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LoadSummary {
    pub permissions: usize,
    pub categories: usize,
    pub users: usize,
    pub articles: usize,
}

impl Fixtures {
    pub fn from_yaml(source: &str) -> Result<Self, FixtureError> {
        Ok(serde_yaml::from_str(source)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, FixtureError> {
        let source = std::fs::read_to_string(path)?;
        Self::from_yaml(&source)
    }

    /// Insert everything in dependency order. Not transactional: a failure
    /// part-way leaves the rows written so far.
    pub async fn load(&self, store: &dyn Store, bcrypt_cost: u32) -> Result<LoadSummary, FixtureError> {
        let mut permission_ids = HashMap::new();
        for name in &self.permissions {
            let permission = store.insert_permission(name).await?;
            permission_ids.insert(permission.name, permission.id);
        }

        let mut category_ids = HashMap::new();
        for fixture in &self.categories {
            let category = store
                .insert_category(NewCategory {
                    name: fixture.name.clone(),
                    slug: fixture.slug.clone(),
                })
                .await?;
            category_ids.insert(category.slug, category.id);
        }

        let mut user_ids = HashMap::new();
        for fixture in &self.users {
            let password = hash_password_blocking(fixture.password.clone(), bcrypt_cost).await?;
            let user = store
                .insert_user(NewUser {
                    name: fixture.name.clone(),
                    email: fixture.email.clone(),
                    password,
                })
                .await?;

            for name in &fixture.permissions {
                let permission_id = lookup(&permission_ids, "permission", name)?;
                store.grant_permission(user.id, permission_id).await?;
            }
            user_ids.insert(user.email, user.id);
        }

        for fixture in &self.articles {
            store
                .insert_article(NewArticle {
                    title: fixture.title.clone(),
                    slug: fixture.slug.clone(),
                    content: fixture.content.clone(),
                    category_id: lookup(&category_ids, "category", &fixture.category)?,
                    user_id: lookup(&user_ids, "author", &fixture.author)?,
                })
                .await?;
        }

        let summary = LoadSummary {
            permissions: self.permissions.len(),
            categories: self.categories.len(),
            users: self.users.len(),
            articles: self.articles.len(),
        };
        tracing::info!("Loaded fixtures: {:?}", summary);
        Ok(summary)
    }
}

fn lookup(ids: &HashMap<String, i64>, kind: &'static str, key: &str) -> Result<i64, FixtureError> {
    ids.get(key).copied().ok_or_else(|| FixtureError::UnknownReference {
        kind,
        key: key.to_string(),
    })
}
