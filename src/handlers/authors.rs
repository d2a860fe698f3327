// handlers/authors.rs - /api/v1/authors resource (users as seen by readers)

use axum::extract::{rejection::QueryRejection, Path, Query, State};

use crate::error::ApiError;
use crate::jsonapi::resources::AUTHORS;
use crate::jsonapi::{Document, API_PREFIX};
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

use super::utils::IncludeQuery;

/// GET /api/v1/authors
pub async fn index(
    State(state): State<AppState>,
    query: Result<Query<IncludeQuery>, QueryRejection>,
) -> ApiResult<Document> {
    let Query(query) = query?;
    let includes = state.registry.resolve(AUTHORS, query.include.as_deref())?;

    let authors = state.store.list_users().await?;
    let document = Document::collection(&authors, &includes, format!("{}/{}", API_PREFIX, AUTHORS))?;
    Ok(ApiResponse::success(document))
}

/// GET /api/v1/authors/:id
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
    query: Result<Query<IncludeQuery>, QueryRejection>,
) -> ApiResult<Document> {
    let Query(query) = query?;
    let includes = state.registry.resolve(AUTHORS, query.include.as_deref())?;

    let not_found = || ApiError::model_not_found(AUTHORS, &id);
    let user_id: i64 = id.parse().map_err(|_| not_found())?;
    let author = state.store.find_user(user_id).await?.ok_or_else(not_found)?;
    Ok(ApiResponse::success(Document::resource(&author, &includes)?))
}
