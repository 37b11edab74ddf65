use super::Window;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const STATUS_DRAFT: &str = "draft";
pub const STATUS_PUBLISHED: &str = "published";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub content: Option<String>,
    pub excerpt: Option<String>,
    pub cover_image: Option<String>,
    pub status: String,
    pub published_at: Option<DateTime<Utc>>,
    pub author_id: Option<Uuid>,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    pub meta_keywords: Option<String>,
    pub view_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct NewPost {
    pub title: String,
    pub slug: String,
    pub content: Option<String>,
    pub excerpt: Option<String>,
    pub cover_image: Option<String>,
    pub status: String,
    pub published_at: Option<DateTime<Utc>>,
    pub author_id: Option<Uuid>,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    pub meta_keywords: Option<String>,
}

/// How an update treats `published_at`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PublishedAtChange {
    #[default]
    Keep,
    Set(DateTime<Utc>),
    /// Fill with `at` if unset; otherwise replace with `otherwise` when given.
    FillIfUnset {
        at: DateTime<Utc>,
        otherwise: Option<DateTime<Utc>>,
    },
}

/// Partial update; `None` leaves the column untouched.
#[derive(Debug, Clone, Default)]
pub struct PostPatch {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub content: Option<String>,
    pub excerpt: Option<String>,
    pub cover_image: Option<String>,
    pub status: Option<String>,
    pub published_at: PublishedAtChange,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    pub meta_keywords: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct FindPostsOptions {
    pub window: Window,
    pub status: Option<String>,
    pub author_id: Option<Uuid>,
    pub search: Option<String>,
}
