use std::collections::HashMap;

use crate::database::models::{Article, Category, User};
use crate::database::{Store, StoreError};
use crate::jsonapi::resources::{AUTHOR, CATEGORY};
use crate::jsonapi::IncludeSet;

/// Eager-load the requested relations onto `articles`, one batch query per
/// relation regardless of how many articles there are.
///
/// A foreign key pointing at a missing row is reported as `NotFound`.
pub async fn load_article_relations(
    store: &dyn Store,
    articles: &mut [Article],
    includes: &IncludeSet,
) -> Result<(), StoreError> {
    if articles.is_empty() {
        return Ok(());
    }

    if includes.contains(CATEGORY) {
        load_categories(store, articles).await?;
    }
    if includes.contains(AUTHOR) {
        load_authors(store, articles).await?;
    }
    Ok(())
}

pub async fn load_categories(store: &dyn Store, articles: &mut [Article]) -> Result<(), StoreError> {
    let ids: Vec<i64> = articles.iter().map(|a| a.category_id).collect();
    let categories: HashMap<i64, _> = store
        .categories_by_ids(&ids)
        .await?
        .into_iter()
        .map(|c| (c.id, c))
        .collect();

    for article in articles.iter_mut() {
        let category = categories.get(&article.category_id).cloned().ok_or_else(|| {
            StoreError::NotFound(format!(
                "category {} of article '{}'",
                article.category_id, article.slug
            ))
        })?;
        article.category = Some(category);
    }
    Ok(())
}

pub async fn load_authors(store: &dyn Store, articles: &mut [Article]) -> Result<(), StoreError> {
    let ids: Vec<i64> = articles.iter().map(|a| a.user_id).collect();
    let users: HashMap<i64, _> = store
        .users_by_ids(&ids)
        .await?
        .into_iter()
        .map(|u| (u.id, u))
        .collect();

    for article in articles.iter_mut() {
        let author = users.get(&article.user_id).cloned().ok_or_else(|| {
            StoreError::NotFound(format!("author {} of article '{}'", article.user_id, article.slug))
        })?;
        article.author = Some(author);
    }
    Ok(())
}

/// The category of a single article, for the related-resource endpoints
pub async fn category_of(store: &dyn Store, article: &Article) -> Result<Category, StoreError> {
    if let Some(category) = &article.category {
        return Ok(category.clone());
    }
    store
        .categories_by_ids(&[article.category_id])
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| StoreError::NotFound(format!("category {} of article '{}'", article.category_id, article.slug)))
}

pub async fn author_of(store: &dyn Store, article: &Article) -> Result<User, StoreError> {
    if let Some(author) = &article.author {
        return Ok(author.clone());
    }
    store
        .find_user(article.user_id)
        .await?
        .ok_or_else(|| StoreError::NotFound(format!("author {} of article '{}'", article.user_id, article.slug)))
}
