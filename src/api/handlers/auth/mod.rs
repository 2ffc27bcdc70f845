//! Account endpoints: register, login and the current-user lookup.
//!
//! Flow Overview:
//! 1) Register validates the payload, hashes the password and issues a token.
//! 2) Login verifies the Argon2 hash and issues a token.
//! 3) `/auth/me` resolves the bearer token back to the stored account.

pub mod password;
pub mod principal;
pub mod token;

use axum::{
    extract::Extension,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use self::{
    password::{hash_password, verify_password},
    principal::require_auth,
    token::TokenConfig,
};
use crate::{
    api::{
        error::ApiError,
        storage::{SharedStore, Store, StoreError, UserRecord},
    },
    model::{ErrorBody, LoginRequest, RegisterRequest, Role, TokenResponse, User},
};

#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "Account created and signed in.", body = TokenResponse),
        (status = 400, description = "Invalid payload or email already registered.", body = ErrorBody),
    ),
    tag = "auth"
)]
#[instrument(skip_all, fields(email = %request.email))]
pub async fn register(
    Extension(store): Extension<SharedStore>,
    Extension(tokens): Extension<Arc<TokenConfig>>,
    Json(request): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if let Some(problem) = request.problem() {
        return Err(ApiError::bad_request(problem));
    }

    let email = request.email.trim().to_string();
    if store.find_user_by_email(&email).await?.is_some() {
        return Err(ApiError::bad_request("Email already registered"));
    }

    let record = UserRecord {
        user: User {
            id: Uuid::new_v4(),
            name: request.name.trim().to_string(),
            email,
            phone: request
                .phone
                .map(|phone| phone.trim().to_string())
                .filter(|phone| !phone.is_empty()),
            role: Role::User,
            favorites: Vec::new(),
            created_at: Utc::now(),
        },
        password_hash: hash_password(&request.password)?,
    };

    let user = match store.insert_user(record).await {
        Ok(user) => user,
        // Lost a race with a concurrent registration for the same email.
        Err(StoreError::Conflict(_)) => {
            return Err(ApiError::bad_request("Email already registered"));
        }
        Err(err) => return Err(err.into()),
    };

    info!(user_id = %user.id, "Registered account");
    let access_token = tokens.issue(user.id)?;
    Ok((StatusCode::OK, Json(TokenResponse::bearer(access_token, user))))
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Signed in.", body = TokenResponse),
        (status = 401, description = "Unknown email or wrong password.", body = ErrorBody),
    ),
    tag = "auth"
)]
#[instrument(skip_all, fields(email = %request.email))]
pub async fn login(
    Extension(store): Extension<SharedStore>,
    Extension(tokens): Extension<Arc<TokenConfig>>,
    Json(request): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let record = store.find_user_by_email(request.email.trim()).await?;
    let Some(record) = record.filter(|r| verify_password(&request.password, &r.password_hash))
    else {
        warn!("Rejected login");
        return Err(ApiError::Unauthorized("Invalid credentials"));
    };

    let access_token = tokens.issue(record.user.id)?;
    Ok(Json(TokenResponse::bearer(access_token, record.user)))
}

#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "The signed-in account.", body = User),
        (status = 401, description = "Missing, malformed or expired token.", body = ErrorBody),
    ),
    security(("bearer" = [])),
    tag = "auth"
)]
pub async fn me(
    headers: HeaderMap,
    Extension(store): Extension<SharedStore>,
    Extension(tokens): Extension<Arc<TokenConfig>>,
) -> Result<Json<User>, ApiError> {
    let user = require_auth(&headers, store.as_ref(), &tokens).await?;
    Ok(Json(user))
}

/// Admin account created at startup when configured.
#[derive(Debug, Clone)]
pub struct AdminSeed {
    pub name: String,
    pub email: String,
    pub password: SecretString,
}

/// Creates the configured admin unless an account with that email exists.
/// An existing account is left untouched, whatever its role.
pub async fn bootstrap_admin(store: &dyn Store, seed: &AdminSeed) -> Result<(), ApiError> {
    if store.find_user_by_email(&seed.email).await?.is_some() {
        info!(email = %seed.email, "Admin account already present");
        return Ok(());
    }
    let record = UserRecord {
        user: User {
            id: Uuid::new_v4(),
            name: seed.name.clone(),
            email: seed.email.clone(),
            phone: None,
            role: Role::Admin,
            favorites: Vec::new(),
            created_at: Utc::now(),
        },
        password_hash: hash_password(seed.password.expose_secret())?,
    };
    let admin = store.insert_user(record).await?;
    info!(user_id = %admin.id, email = %admin.email, "Created admin account");
    Ok(())
}
