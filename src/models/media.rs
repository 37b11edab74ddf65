use super::Window;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Media {
    pub id: Uuid,
    pub filename: String,
    pub original_name: Option<String>,
    pub path: String,
    pub mime_type: Option<String>,
    /// bytes
    pub size: Option<i32>,
    pub width: Option<i32>,
    pub height: Option<i32>,
    pub alt_text: Option<String>,
    pub uploaded_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// Missing text fields deserialize empty so validation can name them.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewMedia {
    pub filename: String,
    pub original_name: Option<String>,
    pub path: String,
    pub mime_type: Option<String>,
    pub size: Option<i32>,
    pub width: Option<i32>,
    pub height: Option<i32>,
    pub alt_text: Option<String>,
    /// Filled from the session, never from the body.
    #[serde(skip)]
    pub uploaded_by: Option<Uuid>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaPatch {
    pub original_name: Option<String>,
    pub alt_text: Option<String>,
    pub width: Option<i32>,
    pub height: Option<i32>,
}

#[derive(Debug, Clone, Default)]
pub struct FindMediaOptions {
    pub window: Window,
    pub uploaded_by: Option<Uuid>,
    /// e.g. `image/`
    pub mime_prefix: Option<String>,
}
