use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::database::models::{
    Article, ArticleChanges, Category, NewArticle, NewCategory, NewToken, NewUser, Permission,
    PersonalAccessToken, User,
};
use crate::database::store::{Store, StoreError};

const ARTICLE_COLUMNS: &str =
    "id, title, slug, content, category_id, user_id, created_at, updated_at";
const CATEGORY_COLUMNS: &str = "id, name, slug, created_at, updated_at";
const USER_COLUMNS: &str = "id, name, email, password, created_at, updated_at";
const TOKEN_COLUMNS: &str = "id, user_id, name, token, abilities, last_used_at, created_at";

/// PostgreSQL-backed store
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Unique constraints created by the migrations, keyed to the column they guard
const UNIQUE_CONSTRAINTS: &[(&str, &str)] = &[
    ("users_email_key", "email"),
    ("categories_slug_key", "slug"),
    ("articles_slug_key", "slug"),
    ("permissions_name_key", "name"),
    ("personal_access_tokens_token_key", "token"),
];

/// Map constraint violations onto `StoreError::UniqueViolation`
fn map_write_error(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db) = &err {
        if db.is_unique_violation() {
            tracing::debug!("Unique violation on {:?}", db.constraint());
            return StoreError::UniqueViolation(unique_field(db.constraint()).to_string());
        }
    }
    StoreError::Sqlx(err)
}

fn unique_field(constraint: Option<&str>) -> &'static str {
    constraint
        .and_then(|name| UNIQUE_CONSTRAINTS.iter().find(|(c, _)| *c == name))
        .map(|(_, field)| *field)
        .unwrap_or("value")
}

#[async_trait]
impl Store for PgStore {
    async fn list_articles(&self) -> Result<Vec<Article>, StoreError> {
        let sql = format!("SELECT {} FROM articles ORDER BY id", ARTICLE_COLUMNS);
        Ok(sqlx::query_as::<_, Article>(&sql).fetch_all(&self.pool).await?)
    }

    async fn find_article_by_slug(&self, slug: &str) -> Result<Option<Article>, StoreError> {
        let sql = format!("SELECT {} FROM articles WHERE slug = $1", ARTICLE_COLUMNS);
        Ok(sqlx::query_as::<_, Article>(&sql)
            .bind(slug)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn insert_article(&self, article: NewArticle) -> Result<Article, StoreError> {
        let sql = format!(
            "INSERT INTO articles (title, slug, content, category_id, user_id)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {}",
            ARTICLE_COLUMNS
        );
        sqlx::query_as::<_, Article>(&sql)
            .bind(article.title)
            .bind(article.slug)
            .bind(article.content)
            .bind(article.category_id)
            .bind(article.user_id)
            .fetch_one(&self.pool)
            .await
            .map_err(map_write_error)
    }

    async fn update_article(&self, id: i64, changes: ArticleChanges) -> Result<Article, StoreError> {
        let sql = format!(
            "UPDATE articles SET
                title = COALESCE($2, title),
                slug = COALESCE($3, slug),
                content = COALESCE($4, content),
                category_id = COALESCE($5, category_id),
                updated_at = now()
             WHERE id = $1
             RETURNING {}",
            ARTICLE_COLUMNS
        );
        sqlx::query_as::<_, Article>(&sql)
            .bind(id)
            .bind(changes.title)
            .bind(changes.slug)
            .bind(changes.content)
            .bind(changes.category_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_write_error)?
            .ok_or_else(|| StoreError::NotFound(format!("article {}", id)))
    }

    async fn delete_article(&self, id: i64) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM articles WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(format!("article {}", id)));
        }
        Ok(())
    }

    async fn list_categories(&self) -> Result<Vec<Category>, StoreError> {
        let sql = format!("SELECT {} FROM categories ORDER BY id", CATEGORY_COLUMNS);
        Ok(sqlx::query_as::<_, Category>(&sql).fetch_all(&self.pool).await?)
    }

    async fn find_category_by_slug(&self, slug: &str) -> Result<Option<Category>, StoreError> {
        let sql = format!("SELECT {} FROM categories WHERE slug = $1", CATEGORY_COLUMNS);
        Ok(sqlx::query_as::<_, Category>(&sql)
            .bind(slug)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn categories_by_ids(&self, ids: &[i64]) -> Result<Vec<Category>, StoreError> {
        if ids.is_empty() {
            return Ok(vec![]);
        }
        let sql = format!(
            "SELECT {} FROM categories WHERE id = ANY($1) ORDER BY id",
            CATEGORY_COLUMNS
        );
        Ok(sqlx::query_as::<_, Category>(&sql)
            .bind(ids.to_vec())
            .fetch_all(&self.pool)
            .await?)
    }

    async fn insert_category(&self, category: NewCategory) -> Result<Category, StoreError> {
        let sql = format!(
            "INSERT INTO categories (name, slug) VALUES ($1, $2) RETURNING {}",
            CATEGORY_COLUMNS
        );
        sqlx::query_as::<_, Category>(&sql)
            .bind(category.name)
            .bind(category.slug)
            .fetch_one(&self.pool)
            .await
            .map_err(map_write_error)
    }

    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        let sql = format!("SELECT {} FROM users ORDER BY id", USER_COLUMNS);
        Ok(sqlx::query_as::<_, User>(&sql).fetch_all(&self.pool).await?)
    }

    async fn find_user(&self, id: i64) -> Result<Option<User>, StoreError> {
        let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        Ok(sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let sql = format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS);
        Ok(sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn users_by_ids(&self, ids: &[i64]) -> Result<Vec<User>, StoreError> {
        if ids.is_empty() {
            return Ok(vec![]);
        }
        let sql = format!("SELECT {} FROM users WHERE id = ANY($1) ORDER BY id", USER_COLUMNS);
        Ok(sqlx::query_as::<_, User>(&sql)
            .bind(ids.to_vec())
            .fetch_all(&self.pool)
            .await?)
    }

    async fn insert_user(&self, user: NewUser) -> Result<User, StoreError> {
        let sql = format!(
            "INSERT INTO users (name, email, password) VALUES ($1, $2, $3) RETURNING {}",
            USER_COLUMNS
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(user.name)
            .bind(user.email)
            .bind(user.password)
            .fetch_one(&self.pool)
            .await
            .map_err(map_write_error)
    }

    async fn insert_permission(&self, name: &str) -> Result<Permission, StoreError> {
        sqlx::query_as::<_, Permission>(
            "INSERT INTO permissions (name) VALUES ($1) RETURNING id, name",
        )
        .bind(name)
        .fetch_one(&self.pool)
        .await
        .map_err(map_write_error)
    }

    async fn grant_permission(&self, user_id: i64, permission_id: i64) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO user_permissions (user_id, permission_id) VALUES ($1, $2)
             ON CONFLICT DO NOTHING",
        )
        .bind(user_id)
        .bind(permission_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn permission_names(&self, user_id: i64) -> Result<Vec<String>, StoreError> {
        let names: Vec<(String,)> = sqlx::query_as(
            "SELECT p.name FROM permissions p
             JOIN user_permissions up ON up.permission_id = p.id
             WHERE up.user_id = $1
             ORDER BY p.id",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(names.into_iter().map(|(name,)| name).collect())
    }

    async fn insert_token(&self, token: NewToken) -> Result<PersonalAccessToken, StoreError> {
        let sql = format!(
            "INSERT INTO personal_access_tokens (user_id, name, token, abilities)
             VALUES ($1, $2, $3, $4)
             RETURNING {}",
            TOKEN_COLUMNS
        );
        sqlx::query_as::<_, PersonalAccessToken>(&sql)
            .bind(token.user_id)
            .bind(token.name)
            .bind(token.token)
            .bind(token.abilities)
            .fetch_one(&self.pool)
            .await
            .map_err(map_write_error)
    }

    async fn find_token(&self, id: i64) -> Result<Option<PersonalAccessToken>, StoreError> {
        let sql = format!("SELECT {} FROM personal_access_tokens WHERE id = $1", TOKEN_COLUMNS);
        Ok(sqlx::query_as::<_, PersonalAccessToken>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn touch_token(&self, id: i64, used_at: DateTime<Utc>) -> Result<(), StoreError> {
        sqlx::query("UPDATE personal_access_tokens SET last_used_at = $2 WHERE id = $1")
            .bind(id)
            .bind(used_at)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn delete_token(&self, id: i64) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM personal_access_tokens WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn tokens_for_user(&self, user_id: i64) -> Result<Vec<PersonalAccessToken>, StoreError> {
        let sql = format!(
            "SELECT {} FROM personal_access_tokens WHERE user_id = $1 ORDER BY id",
            TOKEN_COLUMNS
        );
        Ok(sqlx::query_as::<_, PersonalAccessToken>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
