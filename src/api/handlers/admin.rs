use axum::{extract::Extension, http::HeaderMap, Json};
use std::sync::Arc;

use super::{auth::principal::require_admin, auth::token::TokenConfig};
use crate::{
    api::{error::ApiError, storage::SharedStore},
    model::{Analytics, ErrorBody, InquiryStatus, Role, TransactionStatus},
};

#[utoipa::path(
    get,
    path = "/api/admin/analytics",
    responses(
        (status = 200, description = "Aggregate counters.", body = Analytics),
        (status = 401, description = "Not signed in.", body = ErrorBody),
        (status = 403, description = "Admin access required.", body = ErrorBody),
    ),
    security(("bearer" = [])),
    tag = "admin"
)]
pub async fn analytics(
    headers: HeaderMap,
    Extension(store): Extension<SharedStore>,
    Extension(tokens): Extension<Arc<TokenConfig>>,
) -> Result<Json<Analytics>, ApiError> {
    require_admin(&headers, store.as_ref(), &tokens).await?;
    let (projects, inquiries, new_inquiries, users, transactions, successful_payments) = tokio::try_join!(
        store.count_projects(),
        store.count_inquiries(None),
        store.count_inquiries(Some(InquiryStatus::New)),
        store.count_users(Role::User),
        store.count_transactions(None),
        store.count_transactions(Some(TransactionStatus::Paid)),
    )?;
    Ok(Json(Analytics {
        projects,
        inquiries,
        new_inquiries,
        users,
        transactions,
        successful_payments,
    }))
}
