use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::wire_enum;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ResourceCategory {
    Brochure,
    Ebook,
    Faq,
    Legal,
    Research,
}

wire_enum!(ResourceCategory, "resource category", {
    Brochure => "brochure",
    Ebook => "ebook",
    Faq => "faq",
    Legal => "legal",
    Research => "research",
});

/// A downloadable document. `requires_auth` resources are hidden from anonymous listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Resource {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub category: ResourceCategory,
    pub file_url: String,
    #[serde(default)]
    pub requires_auth: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ResourceInput {
    pub title: String,
    pub description: String,
    pub file_url: String,
    pub category: ResourceCategory,
    #[serde(default)]
    pub requires_auth: bool,
}

impl ResourceInput {
    #[must_use]
    pub fn into_resource(self, id: Uuid, now: DateTime<Utc>) -> Resource {
        Resource {
            id,
            title: self.title,
            description: self.description,
            category: self.category,
            file_url: self.file_url,
            requires_auth: self.requires_auth,
            created_at: now,
        }
    }
}
