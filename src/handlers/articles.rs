// handlers/articles.rs - /api/v1/articles resource, its related resources and relationships

use axum::{
    body::Bytes,
    extract::{
        rejection::{BytesRejection, QueryRejection},
        Path, Query, State,
    },
    Extension,
};

use crate::database::models::{Article, ArticleChanges, Category, NewArticle};
use crate::database::Store;
use crate::error::ApiError;
use crate::jsonapi::resources::{ARTICLES, AUTHOR, CATEGORY};
use crate::jsonapi::{Document, IncludeSet, JsonApiResource, Links, API_PREFIX};
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::relations::{author_of, category_of};
use crate::services::{load_article_relations, Validator};
use crate::state::AppState;

use super::utils::{IncludeQuery, WriteDocument};

pub const ABILITY_CREATE: &str = "articles:create";
pub const ABILITY_UPDATE: &str = "articles:update";
pub const ABILITY_DELETE: &str = "articles:delete";

const TITLE_MIN_CHARS: usize = 4;

/// GET /api/v1/articles - every article, optionally with `include`
pub async fn index(
    State(state): State<AppState>,
    query: Result<Query<IncludeQuery>, QueryRejection>,
) -> ApiResult<Document> {
    let Query(query) = query?;
    let includes = state.registry.resolve(ARTICLES, query.include.as_deref())?;

    let mut articles = state.store.list_articles().await?;
    load_article_relations(state.store.as_ref(), &mut articles, &includes).await?;

    let document = Document::collection(&articles, &includes, format!("{}/{}", API_PREFIX, ARTICLES))?;
    Ok(ApiResponse::success(document))
}

/// GET /api/v1/articles/:slug
pub async fn show(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    query: Result<Query<IncludeQuery>, QueryRejection>,
) -> ApiResult<Document> {
    let Query(query) = query?;
    let includes = state.registry.resolve(ARTICLES, query.include.as_deref())?;

    let mut article = find_article(state.store.as_ref(), &slug).await?;
    load_article_relations(state.store.as_ref(), std::slice::from_mut(&mut article), &includes).await?;

    Ok(ApiResponse::success(Document::resource(&article, &includes)?))
}

/// POST /api/v1/articles - create an article authored by the caller
pub async fn store(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    body: Result<Bytes, BytesRejection>,
) -> ApiResult<Document> {
    auth.authorize(ABILITY_CREATE)?;
    let document = WriteDocument::parse(&body?, ARTICLES)?;
    let store = state.store.as_ref();

    let mut v = Validator::new();
    let title = v.required("title", document.attribute("title"));
    if let Some(title) = title {
        v.min_chars("title", title, TITLE_MIN_CHARS);
    }
    let slug = v.required("slug", document.attribute("slug"));
    if let Some(slug) = slug {
        if v.alpha_dash("slug", slug) && store.find_article_by_slug(slug).await?.is_some() {
            v.unique_violation("slug");
        }
    }
    let content = v.required("content", document.attribute("content"));
    let category = match v.required(CATEGORY, document.relationship_id(CATEGORY)) {
        Some(category_slug) => existing_category(store, &mut v, category_slug).await?,
        None => None,
    };
    v.finish().map_err(|errors| ApiError::invalid_document(errors, article_pointer))?;

    let (Some(title), Some(slug), Some(content), Some(category)) = (title, slug, content, category) else {
        return Err(ApiError::internal_server_error("Validated article is incomplete"));
    };

    let article = store
        .insert_article(NewArticle {
            title: title.to_string(),
            slug: slug.to_string(),
            content: content.to_string(),
            category_id: category.id,
            user_id: auth.id(),
        })
        .await?;

    tracing::info!("User {} created article '{}'", auth.id(), article.slug);
    let location = article.self_link();
    Ok(ApiResponse::created(Document::resource(&article, &IncludeSet::empty())?, location))
}

/// PATCH /api/v1/articles/:slug - partial update by the author
pub async fn update(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(slug): Path<String>,
    body: Result<Bytes, BytesRejection>,
) -> ApiResult<Document> {
    let store = state.store.as_ref();
    let article = find_article(store, &slug).await?;
    authorize_author(&auth, &article, ABILITY_UPDATE)?;

    let document = WriteDocument::parse(&body?, ARTICLES)?;
    if let Some(id) = document.id() {
        if id != article.slug {
            return Err(ApiError::conflict(format!(
                "The resource id '{}' does not match the endpoint id '{}'.",
                id, article.slug
            )));
        }
    }

    let mut v = Validator::new();
    let mut changes = ArticleChanges::default();

    if document.has_attribute("title") {
        if let Some(title) = v.required("title", document.attribute("title")) {
            if v.min_chars("title", title, TITLE_MIN_CHARS) {
                changes.title = Some(title.to_string());
            }
        }
    }
    if document.has_attribute("slug") {
        if let Some(new_slug) = v.required("slug", document.attribute("slug")) {
            if v.alpha_dash("slug", new_slug) {
                let taken = match store.find_article_by_slug(new_slug).await? {
                    Some(other) => other.id != article.id,
                    None => false,
                };
                if taken {
                    v.unique_violation("slug");
                } else {
                    changes.slug = Some(new_slug.to_string());
                }
            }
        }
    }
    if document.has_attribute("content") {
        if let Some(content) = v.required("content", document.attribute("content")) {
            changes.content = Some(content.to_string());
        }
    }
    if document.has_relationship(CATEGORY) {
        if let Some(category_slug) = v.required(CATEGORY, document.relationship_id(CATEGORY)) {
            if let Some(category) = existing_category(store, &mut v, category_slug).await? {
                changes.category_id = Some(category.id);
            }
        }
    }
    v.finish().map_err(|errors| ApiError::invalid_document(errors, article_pointer))?;

    let article = if changes.is_empty() {
        article
    } else {
        store.update_article(article.id, changes).await?
    };

    tracing::info!("User {} updated article '{}'", auth.id(), article.slug);
    Ok(ApiResponse::success(Document::resource(&article, &IncludeSet::empty())?))
}

/// DELETE /api/v1/articles/:slug
pub async fn destroy(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(slug): Path<String>,
) -> ApiResult<()> {
    let article = find_article(state.store.as_ref(), &slug).await?;
    authorize_author(&auth, &article, ABILITY_DELETE)?;

    state.store.delete_article(article.id).await?;
    tracing::info!("User {} deleted article '{}'", auth.id(), article.slug);
    Ok(ApiResponse::<()>::no_content())
}

/// GET /api/v1/articles/:slug/category
pub async fn related_category(State(state): State<AppState>, Path(slug): Path<String>) -> ApiResult<Document> {
    let article = find_article(state.store.as_ref(), &slug).await?;
    let category = category_of(state.store.as_ref(), &article).await?;
    Ok(ApiResponse::success(Document::resource(&category, &IncludeSet::empty())?))
}

/// GET /api/v1/articles/:slug/author
pub async fn related_author(State(state): State<AppState>, Path(slug): Path<String>) -> ApiResult<Document> {
    let article = find_article(state.store.as_ref(), &slug).await?;
    let author = author_of(state.store.as_ref(), &article).await?;
    Ok(ApiResponse::success(Document::resource(&author, &IncludeSet::empty())?))
}

/// GET /api/v1/articles/:slug/relationships/category
pub async fn category_relationship(State(state): State<AppState>, Path(slug): Path<String>) -> ApiResult<Document> {
    let article = find_article(state.store.as_ref(), &slug).await?;
    let category = category_of(state.store.as_ref(), &article).await?;
    Ok(ApiResponse::success(Document::identifier(&category, relationship_links(&article, CATEGORY))))
}

/// GET /api/v1/articles/:slug/relationships/author
pub async fn author_relationship(State(state): State<AppState>, Path(slug): Path<String>) -> ApiResult<Document> {
    let article = find_article(state.store.as_ref(), &slug).await?;
    let author = author_of(state.store.as_ref(), &article).await?;
    Ok(ApiResponse::success(Document::identifier(&author, relationship_links(&article, AUTHOR))))
}

async fn find_article(store: &dyn Store, slug: &str) -> Result<Article, ApiError> {
    store
        .find_article_by_slug(slug)
        .await?
        .ok_or_else(|| ApiError::model_not_found(ARTICLES, slug))
}

/// Ability first, then ownership; both fail with 403
fn authorize_author(auth: &AuthUser, article: &Article, ability: &str) -> Result<(), ApiError> {
    auth.authorize(ability)?;
    if article.user_id != auth.id() {
        tracing::warn!("User {} is not the author of article '{}'", auth.id(), article.slug);
        return Err(ApiError::forbidden());
    }
    Ok(())
}

async fn existing_category(
    store: &dyn Store,
    v: &mut Validator,
    slug: &str,
) -> Result<Option<Category>, ApiError> {
    let category = store.find_category_by_slug(slug).await?;
    if category.is_none() {
        v.fail(CATEGORY, "The selected category is invalid.");
    }
    Ok(category)
}

fn relationship_links(article: &Article, relation: &str) -> Links {
    let base = article.self_link();
    Links {
        self_link: format!("{}/relationships/{}", base, relation),
        related: Some(format!("{}/{}", base, relation)),
    }
}

fn article_pointer(field: &str) -> String {
    match field {
        CATEGORY => format!("/data/relationships/{}", CATEGORY),
        attribute => format!("/data/attributes/{}", attribute),
    }
}
