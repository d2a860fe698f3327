// handlers/categories.rs - /api/v1/categories resource

use axum::extract::{rejection::QueryRejection, Path, Query, State};

use crate::error::ApiError;
use crate::jsonapi::resources::CATEGORIES;
use crate::jsonapi::{Document, API_PREFIX};
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

use super::utils::IncludeQuery;

/// GET /api/v1/categories
pub async fn index(
    State(state): State<AppState>,
    query: Result<Query<IncludeQuery>, QueryRejection>,
) -> ApiResult<Document> {
    let Query(query) = query?;
    // Nothing is includable; any requested name is rejected
    let includes = state.registry.resolve(CATEGORIES, query.include.as_deref())?;

    let categories = state.store.list_categories().await?;
    let document = Document::collection(&categories, &includes, format!("{}/{}", API_PREFIX, CATEGORIES))?;
    Ok(ApiResponse::success(document))
}

/// GET /api/v1/categories/:slug
pub async fn show(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    query: Result<Query<IncludeQuery>, QueryRejection>,
) -> ApiResult<Document> {
    let Query(query) = query?;
    let includes = state.registry.resolve(CATEGORIES, query.include.as_deref())?;

    let category = state
        .store
        .find_category_by_slug(&slug)
        .await?
        .ok_or_else(|| ApiError::model_not_found(CATEGORIES, &slug))?;
    Ok(ApiResponse::success(Document::resource(&category, &includes)?))
}
