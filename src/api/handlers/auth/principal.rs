//! Bearer token resolution and role guards.
//!
//! Flow Overview: read `Authorization: Bearer <jwt>`, verify it, then load the
//! account so role and favorites are always current.

use axum::http::{header::AUTHORIZATION, HeaderMap};

use super::token::TokenConfig;
use crate::{api::error::ApiError, api::storage::Store, model::User};

const BEARER_PREFIX: &str = "Bearer ";

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = value
        .strip_prefix(BEARER_PREFIX)
        .or_else(|| value.strip_prefix("bearer "))?
        .trim();
    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}

/// Resolves the caller, or `None` when no valid token was sent.
pub async fn optional_auth(
    headers: &HeaderMap,
    store: &dyn Store,
    tokens: &TokenConfig,
) -> Result<Option<User>, ApiError> {
    let Some(user_id) = bearer_token(headers).and_then(|token| tokens.verify(token)) else {
        return Ok(None);
    };
    Ok(store.find_user(user_id).await?)
}

/// Resolves the caller or fails with 401.
pub async fn require_auth(
    headers: &HeaderMap,
    store: &dyn Store,
    tokens: &TokenConfig,
) -> Result<User, ApiError> {
    optional_auth(headers, store, tokens)
        .await?
        .ok_or(ApiError::Unauthorized("Could not validate credentials"))
}

/// Resolves the caller and fails with 403 unless they hold the admin role.
pub async fn require_admin(
    headers: &HeaderMap,
    store: &dyn Store,
    tokens: &TokenConfig,
) -> Result<User, ApiError> {
    let user = require_auth(headers, store, tokens).await?;
    if user.is_admin() {
        Ok(user)
    } else {
        Err(ApiError::Forbidden("Admin access required"))
    }
}
