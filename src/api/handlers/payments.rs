//! Payment order stub.
//!
//! Orders are recorded locally and verified with the gateway's signature
//! scheme: `hex(HMAC-SHA256(key_secret, "{order_id}|{payment_id}"))`. No
//! external gateway is contacted.

use axum::{extract::Extension, http::HeaderMap, Json};
use chrono::Utc;
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use std::sync::Arc;
use tracing::{info, warn};
use ulid::Ulid;
use uuid::Uuid;

use super::{auth::principal::require_auth, auth::token::TokenConfig};
use crate::{
    api::{error::ApiError, storage::SharedStore},
    model::{
        ErrorBody, MessageResponse, PaymentOrder, PaymentOrderRequest, PaymentVerification,
        Transaction, TransactionStatus,
    },
};

type HmacSha256 = Hmac<Sha256>;

/// Merchant credentials. Payment routes answer 503 while these are unset.
#[derive(Debug, Clone, Default)]
pub struct PaymentGateway {
    keys: Option<(String, SecretString)>,
}

impl PaymentGateway {
    #[must_use]
    pub fn new(key_id: Option<String>, key_secret: Option<SecretString>) -> Self {
        Self {
            keys: key_id.zip(key_secret),
        }
    }

    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.keys.is_some()
    }

    fn keys(&self) -> Result<(&str, &SecretString), ApiError> {
        self.keys
            .as_ref()
            .map(|(id, secret)| (id.as_str(), secret))
            .ok_or(ApiError::Unavailable("Payment gateway not configured"))
    }
}

fn signing_mac(key_secret: &str, order_id: &str, payment_id: &str) -> Option<HmacSha256> {
    let mut mac = HmacSha256::new_from_slice(key_secret.as_bytes()).ok()?;
    mac.update(order_id.as_bytes());
    mac.update(b"|");
    mac.update(payment_id.as_bytes());
    Some(mac)
}

/// Signature the gateway attaches to a completed payment.
#[must_use]
pub fn payment_signature(key_secret: &str, order_id: &str, payment_id: &str) -> String {
    signing_mac(key_secret, order_id, payment_id)
        .map(|mac| hex::encode(mac.finalize().into_bytes()))
        .unwrap_or_default()
}

fn signature_matches(key_secret: &str, verification: &PaymentVerification) -> bool {
    let Ok(provided) = hex::decode(verification.razorpay_signature.trim()) else {
        return false;
    };
    signing_mac(
        key_secret,
        &verification.razorpay_order_id,
        &verification.razorpay_payment_id,
    )
    .is_some_and(|mac| mac.verify_slice(&provided).is_ok())
}

#[utoipa::path(
    post,
    path = "/api/payments/create-order",
    request_body = PaymentOrderRequest,
    responses(
        (status = 200, description = "Order recorded.", body = PaymentOrder),
        (status = 400, description = "Non-positive amount.", body = ErrorBody),
        (status = 401, description = "Not signed in.", body = ErrorBody),
        (status = 503, description = "Payment gateway not configured.", body = ErrorBody),
    ),
    security(("bearer" = [])),
    tag = "payments"
)]
pub async fn create_order(
    headers: HeaderMap,
    Extension(store): Extension<SharedStore>,
    Extension(tokens): Extension<Arc<TokenConfig>>,
    Extension(gateway): Extension<Arc<PaymentGateway>>,
    Json(request): Json<PaymentOrderRequest>,
) -> Result<Json<PaymentOrder>, ApiError> {
    let (key_id, _) = gateway.keys()?;
    let user = require_auth(&headers, store.as_ref(), &tokens).await?;
    if request.amount <= 0 {
        return Err(ApiError::bad_request("Amount must be positive"));
    }

    let order_id = format!("order_{}", Ulid::new());
    let receipt = request
        .receipt
        .filter(|receipt| !receipt.trim().is_empty())
        .unwrap_or_else(|| Uuid::new_v4().to_string());
    let currency = request.currency.trim().to_ascii_uppercase();

    let transaction = store
        .insert_transaction(Transaction {
            id: Uuid::new_v4(),
            user_id: Some(user.id),
            order_id,
            payment_id: None,
            amount: request.amount,
            currency,
            status: TransactionStatus::Created,
            notes: request.notes,
            created_at: Utc::now(),
        })
        .await?;

    info!(order_id = %transaction.order_id, amount = transaction.amount, "Created payment order");
    Ok(Json(PaymentOrder {
        id: transaction.order_id,
        amount: transaction.amount,
        currency: transaction.currency,
        receipt,
        status: transaction.status,
        key_id: key_id.to_string(),
    }))
}

#[utoipa::path(
    post,
    path = "/api/payments/verify",
    request_body = PaymentVerification,
    responses(
        (status = 200, description = "Signature valid; transaction marked paid.", body = MessageResponse),
        (status = 400, description = "Payment verification failed.", body = ErrorBody),
        (status = 401, description = "Not signed in.", body = ErrorBody),
        (status = 404, description = "Unknown order id, or an order of another account.", body = ErrorBody),
        (status = 409, description = "Order already paid or failed.", body = ErrorBody),
        (status = 503, description = "Payment gateway not configured.", body = ErrorBody),
    ),
    security(("bearer" = [])),
    tag = "payments"
)]
pub async fn verify_payment(
    headers: HeaderMap,
    Extension(store): Extension<SharedStore>,
    Extension(tokens): Extension<Arc<TokenConfig>>,
    Extension(gateway): Extension<Arc<PaymentGateway>>,
    Json(verification): Json<PaymentVerification>,
) -> Result<Json<MessageResponse>, ApiError> {
    let (_, key_secret) = gateway.keys()?;
    let user = require_auth(&headers, store.as_ref(), &tokens).await?;

    let order_id = verification.razorpay_order_id.as_str();
    // Another user's order is reported exactly like an unknown one.
    let transaction = store
        .find_transaction(order_id)
        .await?
        .filter(|transaction| transaction.user_id == Some(user.id))
        .ok_or(ApiError::NotFound("Order not found"))?;
    if transaction.status != TransactionStatus::Created {
        return Err(ApiError::Conflict("Order already settled"));
    }

    if !signature_matches(key_secret.expose_secret(), &verification) {
        warn!(%order_id, "Payment signature mismatch");
        store
            .settle_transaction(order_id, TransactionStatus::Failed, None)
            .await?;
        return Err(ApiError::bad_request("Payment verification failed"));
    }

    let settled = store
        .settle_transaction(
            order_id,
            TransactionStatus::Paid,
            Some(verification.razorpay_payment_id.as_str()),
        )
        .await?;
    if !settled {
        return Err(ApiError::Conflict("Order already settled"));
    }
    info!(%order_id, "Payment verified");
    Ok(Json(MessageResponse::new("Payment verified successfully")))
}
