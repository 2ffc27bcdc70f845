use axum::{
    extract::{Extension, Query},
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

use super::{
    auth::principal::{optional_auth, require_admin},
    auth::token::TokenConfig,
    parse_filter,
};
use crate::{
    api::{error::ApiError, storage::SharedStore},
    model::{ErrorBody, Resource, ResourceCategory, ResourceInput},
};

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ResourceQuery {
    /// One of `brochure`, `ebook`, `faq`, `legal`, `research`. Empty means all.
    pub category: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/resources",
    params(ResourceQuery),
    responses(
        (status = 200, description = "Resources; gated ones only for signed-in callers.", body = [Resource]),
        (status = 400, description = "Unknown category.", body = ErrorBody),
    ),
    tag = "resources"
)]
pub async fn list_resources(
    headers: HeaderMap,
    Extension(store): Extension<SharedStore>,
    Extension(tokens): Extension<Arc<TokenConfig>>,
    Query(query): Query<ResourceQuery>,
) -> Result<Json<Vec<Resource>>, ApiError> {
    let category = parse_filter::<ResourceCategory>(query.category.as_deref())?;
    let signed_in = optional_auth(&headers, store.as_ref(), &tokens)
        .await?
        .is_some();
    Ok(Json(store.list_resources(category, signed_in).await?))
}

#[utoipa::path(
    post,
    path = "/api/resources",
    request_body = ResourceInput,
    responses(
        (status = 201, description = "Resource created.", body = Resource),
        (status = 403, description = "Admin access required.", body = ErrorBody),
    ),
    security(("bearer" = [])),
    tag = "resources"
)]
pub async fn create_resource(
    headers: HeaderMap,
    Extension(store): Extension<SharedStore>,
    Extension(tokens): Extension<Arc<TokenConfig>>,
    Json(input): Json<ResourceInput>,
) -> Result<impl IntoResponse, ApiError> {
    require_admin(&headers, store.as_ref(), &tokens).await?;
    if input.title.trim().is_empty() || input.file_url.trim().is_empty() {
        return Err(ApiError::bad_request("Title and file URL are required"));
    }
    let resource = store
        .insert_resource(input.into_resource(Uuid::new_v4(), Utc::now()))
        .await?;
    info!(id = %resource.id, category = %resource.category, "Created resource");
    Ok((StatusCode::CREATED, Json(resource)))
}
