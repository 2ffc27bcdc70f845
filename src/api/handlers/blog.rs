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
    model::{BlogCategory, BlogPost, BlogPostInput, ErrorBody},
};

pub const DEFAULT_POST_LIMIT: usize = 100;

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct BlogQuery {
    /// One of `news`, `blog`, `media`, `events`. Empty means all.
    pub category: Option<String>,
    /// Maximum number of posts returned; defaults to 100.
    pub limit: Option<usize>,
}

#[utoipa::path(
    get,
    path = "/api/blog",
    params(BlogQuery),
    responses(
        (status = 200, description = "Published posts, newest first.", body = [BlogPost]),
        (status = 400, description = "Unknown category.", body = ErrorBody),
    ),
    tag = "blog"
)]
pub async fn list_posts(
    Extension(store): Extension<SharedStore>,
    Query(query): Query<BlogQuery>,
) -> Result<Json<Vec<BlogPost>>, ApiError> {
    let category = parse_filter::<BlogCategory>(query.category.as_deref())?;
    let limit = query.limit.unwrap_or(DEFAULT_POST_LIMIT);
    Ok(Json(store.list_posts(category, limit).await?))
}

#[utoipa::path(
    get,
    path = "/api/blog/{slug}",
    params(("slug" = String, Path, description = "Post slug")),
    responses(
        (status = 200, description = "The post.", body = BlogPost),
        (status = 404, description = "No post with that slug.", body = ErrorBody),
    ),
    tag = "blog"
)]
pub async fn get_post(
    Extension(store): Extension<SharedStore>,
    Path(slug): Path<String>,
) -> Result<Json<BlogPost>, ApiError> {
    store
        .find_post_by_slug(&slug)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound("Post not found"))
}

#[utoipa::path(
    post,
    path = "/api/blog",
    request_body = BlogPostInput,
    responses(
        (status = 201, description = "Post created.", body = BlogPost),
        (status = 400, description = "Invalid slug.", body = ErrorBody),
        (status = 403, description = "Admin access required.", body = ErrorBody),
        (status = 409, description = "Slug already taken.", body = ErrorBody),
    ),
    security(("bearer" = [])),
    tag = "blog"
)]
pub async fn create_post(
    headers: HeaderMap,
    Extension(store): Extension<SharedStore>,
    Extension(tokens): Extension<Arc<TokenConfig>>,
    Json(input): Json<BlogPostInput>,
) -> Result<impl IntoResponse, ApiError> {
    require_admin(&headers, store.as_ref(), &tokens).await?;
    let slug = slug_for(&input.slug, &input.title)?;
    let post = store
        .insert_post(input.into_post(Uuid::new_v4(), slug, Utc::now()))
        .await?;
    info!(slug = %post.slug, category = %post.category, "Created post");
    Ok((StatusCode::CREATED, Json(post)))
}
