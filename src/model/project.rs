use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::wire_enum;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    Ongoing,
    Completed,
    Upcoming,
}

wire_enum!(ProjectStatus, "project status", {
    Ongoing => "ongoing",
    Completed => "completed",
    Upcoming => "upcoming",
});

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FloorPlan {
    pub name: String,
    pub image: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Project {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub tagline: String,
    pub description: String,
    pub location: String,
    pub status: ProjectStatus,
    pub hero_image: String,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub amenities: Vec<String>,
    #[serde(default)]
    pub floor_plans: Vec<FloorPlan>,
    #[serde(default)]
    pub coordinates: Option<Coordinates>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Editable project fields, used for both create and full-replace update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProjectInput {
    pub title: String,
    pub slug: String,
    pub tagline: String,
    pub description: String,
    pub location: String,
    pub status: ProjectStatus,
    pub hero_image: String,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub amenities: Vec<String>,
    #[serde(default)]
    pub floor_plans: Vec<FloorPlan>,
    #[serde(default)]
    pub coordinates: Option<Coordinates>,
}

impl ProjectInput {
    /// Materializes a stored project. `slug` must already be normalized.
    #[must_use]
    pub fn into_project(self, id: Uuid, slug: String, now: DateTime<Utc>) -> Project {
        Project {
            id,
            slug,
            title: self.title,
            tagline: self.tagline,
            description: self.description,
            location: self.location,
            status: self.status,
            hero_image: self.hero_image,
            images: self.images,
            amenities: self.amenities,
            floor_plans: self.floor_plans,
            coordinates: self.coordinates,
            created_at: now,
            updated_at: now,
        }
    }
}
