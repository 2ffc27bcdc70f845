use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Aggregate counters shown on the admin dashboard. Computed server-side on every request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Analytics {
    pub projects: u64,
    pub inquiries: u64,
    pub new_inquiries: u64,
    /// Accounts with the `user` role; admins are not counted.
    pub users: u64,
    #[serde(default)]
    pub transactions: u64,
    pub successful_payments: u64,
}
