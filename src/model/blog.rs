use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::wire_enum;

pub const DEFAULT_AUTHOR: &str = "HTY REALTY";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum BlogCategory {
    News,
    Blog,
    Media,
    Events,
}

wire_enum!(BlogCategory, "blog category", {
    News => "news",
    Blog => "blog",
    Media => "media",
    Events => "events",
});

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct BlogPost {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub excerpt: String,
    #[serde(default)]
    pub content: String,
    pub category: BlogCategory,
    pub image: String,
    #[serde(default = "default_author")]
    pub author: String,
    #[serde(default = "default_published")]
    pub published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct BlogPostInput {
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    #[serde(default)]
    pub content: String,
    pub category: BlogCategory,
    pub image: String,
    #[serde(default = "default_published")]
    pub published: bool,
}

impl BlogPostInput {
    #[must_use]
    pub fn into_post(self, id: Uuid, slug: String, now: DateTime<Utc>) -> BlogPost {
        BlogPost {
            id,
            slug,
            title: self.title,
            excerpt: self.excerpt,
            content: self.content,
            category: self.category,
            image: self.image,
            author: default_author(),
            published: self.published,
            created_at: now,
            updated_at: now,
        }
    }
}

fn default_author() -> String {
    DEFAULT_AUTHOR.to_string()
}

const fn default_published() -> bool {
    true
}
