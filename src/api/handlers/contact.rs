//! Contact inquiries: public submission, admin listing and status triage.

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

use super::{auth::principal::require_admin, auth::token::TokenConfig, parse_filter};
use crate::{
    api::{error::ApiError, storage::SharedStore},
    model::{
        ContactInquiry, ContactInquiryInput, ErrorBody, InquiryStatus, MessageResponse,
        SubmitReceipt,
    },
};

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct InquiryQuery {
    /// One of `new`, `contacted`, `closed`. Empty means all.
    pub status: Option<String>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct StatusQuery {
    /// Target status: `new`, `contacted` or `closed`.
    pub status: Option<String>,
}

#[utoipa::path(
    post,
    path = "/api/contact",
    request_body = ContactInquiryInput,
    responses(
        (status = 200, description = "Inquiry stored.", body = SubmitReceipt),
        (status = 400, description = "Missing field or malformed email.", body = ErrorBody),
    ),
    tag = "contact"
)]
pub async fn submit_inquiry(
    Extension(store): Extension<SharedStore>,
    Json(input): Json<ContactInquiryInput>,
) -> Result<impl IntoResponse, ApiError> {
    if let Some(problem) = input.problem() {
        return Err(ApiError::bad_request(problem));
    }
    let inquiry = store
        .insert_inquiry(input.into_inquiry(Uuid::new_v4(), Utc::now()))
        .await?;
    info!(id = %inquiry.id, kind = %inquiry.inquiry_type, "Stored inquiry");
    Ok((
        StatusCode::OK,
        Json(SubmitReceipt {
            message: "Inquiry submitted successfully".to_string(),
            id: inquiry.id,
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/api/contact",
    params(InquiryQuery),
    responses(
        (status = 200, description = "Inquiries, newest first.", body = [ContactInquiry]),
        (status = 400, description = "Unknown status filter.", body = ErrorBody),
        (status = 401, description = "Not signed in.", body = ErrorBody),
        (status = 403, description = "Admin access required.", body = ErrorBody),
    ),
    security(("bearer" = [])),
    tag = "contact"
)]
pub async fn list_inquiries(
    headers: HeaderMap,
    Extension(store): Extension<SharedStore>,
    Extension(tokens): Extension<Arc<TokenConfig>>,
    Query(query): Query<InquiryQuery>,
) -> Result<Json<Vec<ContactInquiry>>, ApiError> {
    require_admin(&headers, store.as_ref(), &tokens).await?;
    let status = parse_filter::<InquiryStatus>(query.status.as_deref())?;
    Ok(Json(store.list_inquiries(status).await?))
}

#[utoipa::path(
    put,
    path = "/api/contact/{id}/status",
    params(("id" = Uuid, Path, description = "Inquiry id"), StatusQuery),
    responses(
        (status = 200, description = "Status updated.", body = MessageResponse),
        (status = 400, description = "Missing or unknown status.", body = ErrorBody),
        (status = 403, description = "Admin access required.", body = ErrorBody),
        (status = 404, description = "Unknown inquiry id.", body = ErrorBody),
    ),
    security(("bearer" = [])),
    tag = "contact"
)]
pub async fn update_inquiry_status(
    headers: HeaderMap,
    Extension(store): Extension<SharedStore>,
    Extension(tokens): Extension<Arc<TokenConfig>>,
    Path(id): Path<String>,
    Query(query): Query<StatusQuery>,
) -> Result<Json<MessageResponse>, ApiError> {
    require_admin(&headers, store.as_ref(), &tokens).await?;
    let status = parse_filter::<InquiryStatus>(query.status.as_deref())?
        .ok_or_else(|| ApiError::bad_request("Status is required"))?;
    let id = Uuid::parse_str(&id).map_err(|_| ApiError::NotFound("Inquiry not found"))?;
    if !store.update_inquiry_status(id, status).await? {
        return Err(ApiError::NotFound("Inquiry not found"));
    }
    info!(%id, %status, "Updated inquiry status");
    Ok(Json(MessageResponse::new("Status updated")))
}
