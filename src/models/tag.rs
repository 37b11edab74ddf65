use super::Window;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewTag {
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TagPatch {
    pub name: Option<String>,
    pub slug: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct FindTagsOptions {
    pub window: Window,
    pub search: Option<String>,
}
