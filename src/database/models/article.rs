use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::{category::Category, user::User};

/// Article row plus the relations that have been eager-loaded for it.
///
/// `category` and `author` stay `None` until the relation loader fills them;
/// the serializer treats a requested-but-unloaded relation as a defect.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Article {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub category_id: i64,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    #[sqlx(skip)]
    #[serde(skip)]
    pub category: Option<Category>,
    #[sqlx(skip)]
    #[serde(skip)]
    pub author: Option<User>,
}

#[derive(Debug, Clone)]
pub struct NewArticle {
    pub title: String,
    pub slug: String,
    pub content: String,
    pub category_id: i64,
    pub user_id: i64,
}

/// Partial update; `None` leaves the column untouched.
#[derive(Debug, Clone, Default)]
pub struct ArticleChanges {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub content: Option<String>,
    pub category_id: Option<i64>,
}

impl ArticleChanges {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.slug.is_none() && self.content.is_none() && self.category_id.is_none()
    }

    /// Apply the changes to an in-memory row
    pub fn apply(&self, article: &mut Article) {
        if let Some(title) = &self.title {
            article.title = title.clone();
        }
        if let Some(slug) = &self.slug {
            article.slug = slug.clone();
        }
        if let Some(content) = &self.content {
            article.content = content.clone();
        }
        if let Some(category_id) = self.category_id {
            if category_id != article.category_id {
                article.category = None;
            }
            article.category_id = category_id;
        }
    }
}
