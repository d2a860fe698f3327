use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::database::models::{
    Article, ArticleChanges, Category, NewArticle, NewCategory, NewToken, NewUser, Permission,
    PersonalAccessToken, User,
};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate value for {0}")]
    UniqueViolation(String),

    #[error("Migration error: {0}")]
    Migration(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Data access used by the handlers. Rows come back in primary key order.
#[async_trait]
pub trait Store: Send + Sync {
    // Articles
    async fn list_articles(&self) -> Result<Vec<Article>, StoreError>;
    async fn find_article_by_slug(&self, slug: &str) -> Result<Option<Article>, StoreError>;
    async fn insert_article(&self, article: NewArticle) -> Result<Article, StoreError>;
    async fn update_article(&self, id: i64, changes: ArticleChanges) -> Result<Article, StoreError>;
    async fn delete_article(&self, id: i64) -> Result<(), StoreError>;

    // Categories
    async fn list_categories(&self) -> Result<Vec<Category>, StoreError>;
    async fn find_category_by_slug(&self, slug: &str) -> Result<Option<Category>, StoreError>;
    async fn categories_by_ids(&self, ids: &[i64]) -> Result<Vec<Category>, StoreError>;
    async fn insert_category(&self, category: NewCategory) -> Result<Category, StoreError>;

    // Users
    async fn list_users(&self) -> Result<Vec<User>, StoreError>;
    async fn find_user(&self, id: i64) -> Result<Option<User>, StoreError>;
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;
    async fn users_by_ids(&self, ids: &[i64]) -> Result<Vec<User>, StoreError>;
    async fn insert_user(&self, user: NewUser) -> Result<User, StoreError>;

    // Permissions
    async fn insert_permission(&self, name: &str) -> Result<Permission, StoreError>;
    async fn grant_permission(&self, user_id: i64, permission_id: i64) -> Result<(), StoreError>;
    async fn permission_names(&self, user_id: i64) -> Result<Vec<String>, StoreError>;

    // Personal access tokens
    async fn insert_token(&self, token: NewToken) -> Result<PersonalAccessToken, StoreError>;
    async fn find_token(&self, id: i64) -> Result<Option<PersonalAccessToken>, StoreError>;
    async fn touch_token(&self, id: i64, used_at: DateTime<Utc>) -> Result<(), StoreError>;
    async fn delete_token(&self, id: i64) -> Result<(), StoreError>;
    async fn tokens_for_user(&self, user_id: i64) -> Result<Vec<PersonalAccessToken>, StoreError>;

    /// Cheap connectivity probe for /health
    async fn ping(&self) -> Result<(), StoreError>;
}
