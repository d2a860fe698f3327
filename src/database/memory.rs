use std::collections::{BTreeMap, BTreeSet};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::database::models::{
    Article, ArticleChanges, Category, NewArticle, NewCategory, NewToken, NewUser, Permission,
    PersonalAccessToken, User,
};
use crate::database::store::{Store, StoreError};

#[derive(Default)]
struct Tables {
    next_id: i64,
    articles: BTreeMap<i64, Article>,
    categories: BTreeMap<i64, Category>,
    users: BTreeMap<i64, User>,
    permissions: BTreeMap<i64, Permission>,
    grants: BTreeSet<(i64, i64)>,
    tokens: BTreeMap<i64, PersonalAccessToken>,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn slug_taken(&self, slug: &str, except: Option<i64>) -> bool {
        self.articles
            .values()
            .any(|a| a.slug == slug && Some(a.id) != except)
    }
}

/// In-process store backed by ordered maps behind a tokio `RwLock`.
///
/// Used when no `DATABASE_URL` is configured and by the test suite. Ids are
/// drawn from a single counter so they never repeat across tables.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn by_ids<T: Clone>(table: &BTreeMap<i64, T>, ids: &[i64]) -> Vec<T> {
    let wanted: BTreeSet<i64> = ids.iter().copied().collect();
    wanted.iter().filter_map(|id| table.get(id).cloned()).collect()
}

#[async_trait]
impl Store for MemoryStore {
    async fn list_articles(&self) -> Result<Vec<Article>, StoreError> {
        Ok(self.tables.read().await.articles.values().cloned().collect())
    }

    async fn find_article_by_slug(&self, slug: &str) -> Result<Option<Article>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.articles.values().find(|a| a.slug == slug).cloned())
    }

    async fn insert_article(&self, article: NewArticle) -> Result<Article, StoreError> {
        let mut tables = self.tables.write().await;
        if tables.slug_taken(&article.slug, None) {
            return Err(StoreError::UniqueViolation("slug".into()));
        }
        let now = Utc::now();
        let id = tables.next_id();
        let row = Article {
            id,
            title: article.title,
            slug: article.slug,
            content: article.content,
            category_id: article.category_id,
            user_id: article.user_id,
            created_at: now,
            updated_at: now,
            category: None,
            author: None,
        };
        tables.articles.insert(id, row.clone());
        Ok(row)
    }

    async fn update_article(&self, id: i64, changes: ArticleChanges) -> Result<Article, StoreError> {
        let mut tables = self.tables.write().await;
        if let Some(slug) = &changes.slug {
            if tables.slug_taken(slug, Some(id)) {
                return Err(StoreError::UniqueViolation("slug".into()));
            }
        }
        let article = tables
            .articles
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound(format!("article {}", id)))?;
        changes.apply(article);
        article.updated_at = Utc::now();
        Ok(article.clone())
    }

    async fn delete_article(&self, id: i64) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        tables
            .articles
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(format!("article {}", id)))
    }

    async fn list_categories(&self) -> Result<Vec<Category>, StoreError> {
        Ok(self.tables.read().await.categories.values().cloned().collect())
    }

    async fn find_category_by_slug(&self, slug: &str) -> Result<Option<Category>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.categories.values().find(|c| c.slug == slug).cloned())
    }

    async fn categories_by_ids(&self, ids: &[i64]) -> Result<Vec<Category>, StoreError> {
        Ok(by_ids(&self.tables.read().await.categories, ids))
    }

    async fn insert_category(&self, category: NewCategory) -> Result<Category, StoreError> {
        let mut tables = self.tables.write().await;
        if tables.categories.values().any(|c| c.slug == category.slug) {
            return Err(StoreError::UniqueViolation("slug".into()));
        }
        let now = Utc::now();
        let id = tables.next_id();
        let row = Category {
            id,
            name: category.name,
            slug: category.slug,
            created_at: now,
            updated_at: now,
        };
        tables.categories.insert(id, row.clone());
        Ok(row)
    }

    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        Ok(self.tables.read().await.users.values().cloned().collect())
    }

    async fn find_user(&self, id: i64) -> Result<Option<User>, StoreError> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.email == email).cloned())
    }

    async fn users_by_ids(&self, ids: &[i64]) -> Result<Vec<User>, StoreError> {
        Ok(by_ids(&self.tables.read().await.users, ids))
    }

    async fn insert_user(&self, user: NewUser) -> Result<User, StoreError> {
        let mut tables = self.tables.write().await;
        if tables.users.values().any(|u| u.email == user.email) {
            return Err(StoreError::UniqueViolation("email".into()));
        }
        let now = Utc::now();
        let id = tables.next_id();
        let row = User {
            id,
            name: user.name,
            email: user.email,
            password: user.password,
            created_at: now,
            updated_at: now,
        };
        tables.users.insert(id, row.clone());
        Ok(row)
    }

    async fn insert_permission(&self, name: &str) -> Result<Permission, StoreError> {
        let mut tables = self.tables.write().await;
        if tables.permissions.values().any(|p| p.name == name) {
            return Err(StoreError::UniqueViolation("name".into()));
        }
        let id = tables.next_id();
        let row = Permission { id, name: name.to_string() };
        tables.permissions.insert(id, row.clone());
        Ok(row)
    }

    async fn grant_permission(&self, user_id: i64, permission_id: i64) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&user_id) {
            return Err(StoreError::NotFound(format!("user {}", user_id)));
        }
        if !tables.permissions.contains_key(&permission_id) {
            return Err(StoreError::NotFound(format!("permission {}", permission_id)));
        }
        tables.grants.insert((user_id, permission_id));
        Ok(())
    }

    async fn permission_names(&self, user_id: i64) -> Result<Vec<String>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .grants
            .iter()
            .filter(|(user, _)| *user == user_id)
            .filter_map(|(_, permission)| tables.permissions.get(permission))
            .map(|p| p.name.clone())
            .collect())
    }

    async fn insert_token(&self, token: NewToken) -> Result<PersonalAccessToken, StoreError> {
        let mut tables = self.tables.write().await;
        let id = tables.next_id();
        let row = PersonalAccessToken {
            id,
            user_id: token.user_id,
            name: token.name,
            token: token.token,
            abilities: token.abilities,
            last_used_at: None,
            created_at: Utc::now(),
        };
        tables.tokens.insert(id, row.clone());
        Ok(row)
    }

    async fn find_token(&self, id: i64) -> Result<Option<PersonalAccessToken>, StoreError> {
        Ok(self.tables.read().await.tokens.get(&id).cloned())
    }

    async fn touch_token(&self, id: i64, used_at: DateTime<Utc>) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        if let Some(token) = tables.tokens.get_mut(&id) {
            token.last_used_at = Some(used_at);
        }
        Ok(())
    }

    async fn delete_token(&self, id: i64) -> Result<(), StoreError> {
        self.tables.write().await.tokens.remove(&id);
        Ok(())
    }

    async fn tokens_for_user(&self, user_id: i64) -> Result<Vec<PersonalAccessToken>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .tokens
            .values()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
