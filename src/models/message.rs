use super::Window;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub subject: Option<String>,
    pub content: String,
    pub is_read: bool,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub locale: Option<String>,
    pub created_at: DateTime<Utc>,
    pub read_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default)]
pub struct NewMessage {
    pub name: String,
    pub email: String,
    pub subject: Option<String>,
    pub content: String,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub locale: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct FindMessagesOptions {
    pub window: Window,
    pub is_read: Option<bool>,
}
