use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::{user::valid_email, wire_enum};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum InquiryType {
    Callback,
    Question,
}

wire_enum!(InquiryType, "inquiry type", {
    Callback => "callback",
    Question => "question",
});

/// Triage state of an inquiry. Any value may be set from any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum InquiryStatus {
    #[default]
    New,
    Contacted,
    Closed,
}

wire_enum!(InquiryStatus, "inquiry status", {
    New => "new",
    Contacted => "contacted",
    Closed => "closed",
});

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ContactInquiry {
    pub id: Uuid,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub message: String,
    pub inquiry_type: InquiryType,
    #[serde(default)]
    pub preferred_time: Option<String>,
    #[serde(default)]
    pub status: InquiryStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ContactInquiryInput {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub message: String,
    pub inquiry_type: InquiryType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_time: Option<String>,
}

impl ContactInquiryInput {
    /// Returns the first reason this submission must be rejected.
    #[must_use]
    pub fn problem(&self) -> Option<&'static str> {
        let required = [
            (&self.name, "Name is required"),
            (&self.phone, "Phone is required"),
            (&self.email, "Email is required"),
            (&self.message, "Message is required"),
        ];
        if let Some((_, message)) = required.iter().find(|(value, _)| value.trim().is_empty()) {
            return Some(*message);
        }
        if !valid_email(self.email.trim()) {
            return Some("Invalid email address");
        }
        None
    }

    /// New inquiries always start in `new`, whatever the caller sent.
    #[must_use]
    pub fn into_inquiry(self, id: Uuid, now: DateTime<Utc>) -> ContactInquiry {
        ContactInquiry {
            id,
            name: self.name.trim().to_string(),
            phone: self.phone.trim().to_string(),
            email: self.email.trim().to_string(),
            message: self.message,
            inquiry_type: self.inquiry_type,
            preferred_time: self.preferred_time.filter(|time| !time.trim().is_empty()),
            status: InquiryStatus::New,
            created_at: now,
        }
    }
}

/// Acknowledgement for a stored inquiry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SubmitReceipt {
    pub message: String,
    pub id: Uuid,
}
