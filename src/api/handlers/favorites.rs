//! Per-user favorite projects. Adds and removes are set operations, so both
//! are idempotent and neither checks that the project exists.

use axum::{
    extract::{Extension, Path},
    http::HeaderMap,
    Json,
};
use std::sync::Arc;
use uuid::Uuid;

use super::{auth::principal::require_auth, auth::token::TokenConfig};
use crate::{
    api::{error::ApiError, storage::SharedStore},
    model::{ErrorBody, MessageResponse, Project},
};

fn project_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::bad_request("Invalid project id"))
}

#[utoipa::path(
    get,
    path = "/api/users/favorites",
    responses(
        (status = 200, description = "Favorite projects that still exist.", body = [Project]),
        (status = 401, description = "Not signed in.", body = ErrorBody),
    ),
    security(("bearer" = [])),
    tag = "favorites"
)]
pub async fn list_favorites(
    headers: HeaderMap,
    Extension(store): Extension<SharedStore>,
    Extension(tokens): Extension<Arc<TokenConfig>>,
) -> Result<Json<Vec<Project>>, ApiError> {
    let user = require_auth(&headers, store.as_ref(), &tokens).await?;
    Ok(Json(store.find_projects(&user.favorites).await?))
}

#[utoipa::path(
    post,
    path = "/api/users/favorites/{project_id}",
    params(("project_id" = Uuid, Path, description = "Project id")),
    responses(
        (status = 200, description = "Added (or already present).", body = MessageResponse),
        (status = 401, description = "Not signed in.", body = ErrorBody),
    ),
    security(("bearer" = [])),
    tag = "favorites"
)]
pub async fn add_favorite(
    headers: HeaderMap,
    Extension(store): Extension<SharedStore>,
    Extension(tokens): Extension<Arc<TokenConfig>>,
    Path(raw): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let user = require_auth(&headers, store.as_ref(), &tokens).await?;
    store.add_favorite(user.id, project_id(&raw)?).await?;
    Ok(Json(MessageResponse::new("Added to favorites")))
}

#[utoipa::path(
    delete,
    path = "/api/users/favorites/{project_id}",
    params(("project_id" = Uuid, Path, description = "Project id")),
    responses(
        (status = 200, description = "Removed (or was absent).", body = MessageResponse),
        (status = 401, description = "Not signed in.", body = ErrorBody),
    ),
    security(("bearer" = [])),
    tag = "favorites"
)]
pub async fn remove_favorite(
    headers: HeaderMap,
    Extension(store): Extension<SharedStore>,
    Extension(tokens): Extension<Arc<TokenConfig>>,
    Path(raw): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let user = require_auth(&headers, store.as_ref(), &tokens).await?;
    store.remove_favorite(user.id, project_id(&raw)?).await?;
    Ok(Json(MessageResponse::new("Removed from favorites")))
}
