//! Project catalog: public listing and lookup, admin create/replace/delete.

use axum::{
    extract::{Extension, Path, Query},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;
use utoipa::IntoParams;
use uuid::Uuid;

use super::{auth::principal::require_admin, auth::token::TokenConfig, parse_filter, slug::slug_for};
use crate::{
    api::{error::ApiError, storage::SharedStore},
    model::{ErrorBody, MessageResponse, Project, ProjectInput, ProjectStatus},
};

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProjectQuery {
    /// One of `ongoing`, `completed`, `upcoming`. Empty means all.
    pub status: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/projects",
    params(ProjectQuery),
    responses(
        (status = 200, description = "Projects in catalog order.", body = [Project]),
        (status = 400, description = "Unknown status filter.", body = ErrorBody),
    ),
    tag = "projects"
)]
pub async fn list_projects(
    Extension(store): Extension<SharedStore>,
    Query(query): Query<ProjectQuery>,
) -> Result<Json<Vec<Project>>, ApiError> {
    let status = parse_filter::<ProjectStatus>(query.status.as_deref())?;
    Ok(Json(store.list_projects(status).await?))
}

#[utoipa::path(
    get,
    path = "/api/projects/{slug}",
    params(("slug" = String, Path, description = "Project slug")),
    responses(
        (status = 200, description = "The project.", body = Project),
        (status = 404, description = "No project with that slug.", body = ErrorBody),
    ),
    tag = "projects"
)]
pub async fn get_project(
    Extension(store): Extension<SharedStore>,
    Path(slug): Path<String>,
) -> Result<Json<Project>, ApiError> {
    store
        .find_project_by_slug(&slug)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound("Project not found"))
}

#[utoipa::path(
    post,
    path = "/api/projects",
    request_body = ProjectInput,
    responses(
        (status = 201, description = "Project created.", body = Project),
        (status = 400, description = "Invalid slug.", body = ErrorBody),
        (status = 403, description = "Admin access required.", body = ErrorBody),
        (status = 409, description = "Slug already taken.", body = ErrorBody),
    ),
    security(("bearer" = [])),
    tag = "projects"
)]
pub async fn create_project(
    headers: HeaderMap,
    Extension(store): Extension<SharedStore>,
    Extension(tokens): Extension<Arc<TokenConfig>>,
    Json(input): Json<ProjectInput>,
) -> Result<impl IntoResponse, ApiError> {
    require_admin(&headers, store.as_ref(), &tokens).await?;
    let slug = slug_for(&input.slug, &input.title)?;
    let project = input.into_project(Uuid::new_v4(), slug, Utc::now());
    let project = store.insert_project(project).await?;
    info!(slug = %project.slug, "Created project");
    Ok((StatusCode::CREATED, Json(project)))
}

#[utoipa::path(
    put,
    path = "/api/projects/{id}",
    params(("id" = Uuid, Path, description = "Project id")),
    request_body = ProjectInput,
    responses(
        (status = 200, description = "Project replaced.", body = Project),
        (status = 403, description = "Admin access required.", body = ErrorBody),
        (status = 404, description = "Unknown project id.", body = ErrorBody),
        (status = 409, description = "Slug already taken.", body = ErrorBody),
    ),
    security(("bearer" = [])),
    tag = "projects"
)]
pub async fn update_project(
    headers: HeaderMap,
    Extension(store): Extension<SharedStore>,
    Extension(tokens): Extension<Arc<TokenConfig>>,
    Path(id): Path<String>,
    Json(input): Json<ProjectInput>,
) -> Result<Json<Project>, ApiError> {
    require_admin(&headers, store.as_ref(), &tokens).await?;
    let id = parse_id(&id)?;
    let slug = slug_for(&input.slug, &input.title)?;
    let now = Utc::now();
    // created_at is ignored by the store on update.
    let project = input.into_project(id, slug, now);
    store
        .update_project(project)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound("Project not found"))
}

#[utoipa::path(
    delete,
    path = "/api/projects/{id}",
    params(("id" = Uuid, Path, description = "Project id")),
    responses(
        (status = 200, description = "Project deleted.", body = MessageResponse),
        (status = 403, description = "Admin access required.", body = ErrorBody),
        (status = 404, description = "Unknown project id.", body = ErrorBody),
    ),
    security(("bearer" = [])),
    tag = "projects"
)]
pub async fn delete_project(
    headers: HeaderMap,
    Extension(store): Extension<SharedStore>,
    Extension(tokens): Extension<Arc<TokenConfig>>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    require_admin(&headers, store.as_ref(), &tokens).await?;
    let id = parse_id(&id)?;
    if store.delete_project(id).await? {
        info!(%id, "Deleted project");
        Ok(Json(MessageResponse::new("Project deleted")))
    } else {
        Err(ApiError::NotFound("Project not found"))
    }
}

/// Path ids share a route segment with slugs, so they arrive as text.
fn parse_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::NotFound("Project not found"))
}
