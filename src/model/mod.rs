//! Records exchanged over the `/api` surface.
//!
//! The same types are serialized by the backend handlers and decoded by the
//! client core, so the wire format lives in exactly one place. Enumerated
//! fields (statuses, categories, roles) are closed enums with lowercase wire
//! names; anything else is rejected at the edge.

/// Implements `as_str`, `Display` and `FromStr` for a closed wire enum.
macro_rules! wire_enum {
    ($ty:ident, $kind:literal, { $($variant:ident => $wire:literal),+ $(,)? }) => {
        impl $ty {
            /// Every variant, in declaration order.
            pub const ALL: &'static [$ty] = &[$($ty::$variant),+];

            /// Wire name used in JSON bodies, query strings and SQL columns.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $($ty::$variant => $wire),+
                }
            }
        }

        impl ::std::fmt::Display for $ty {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl ::std::str::FromStr for $ty {
            type Err = $crate::model::UnknownVariant;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                match value.trim().to_ascii_lowercase().as_str() {
                    $($wire => Ok($ty::$variant),)+
                    _ => Err($crate::model::UnknownVariant {
                        kind: $kind,
                        value: value.to_string(),
                    }),
                }
            }
        }
    };
}

pub(crate) use wire_enum;

pub mod analytics;
pub mod blog;
pub mod inquiry;
pub mod payment;
pub mod project;
pub mod resource;
pub mod user;

pub use analytics::Analytics;
pub use blog::{BlogCategory, BlogPost, BlogPostInput};
pub use inquiry::{ContactInquiry, ContactInquiryInput, InquiryStatus, InquiryType, SubmitReceipt};
pub use payment::{
    PaymentOrder, PaymentOrderRequest, PaymentVerification, Transaction, TransactionStatus,
};
pub use project::{Coordinates, FloorPlan, Project, ProjectInput, ProjectStatus};
pub use resource::{Resource, ResourceCategory, ResourceInput};
pub use user::{valid_email, LoginRequest, RegisterRequest, Role, TokenResponse, User};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Plain acknowledgement body returned by mutations that have nothing else to say.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Error body shared by every non-2xx response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub detail: String,
}

/// Raised when a filter or status string does not name a known variant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind}: {value}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}
