//! Contact message handlers.

use super::common::{bool_param, client_ip, parse_id, user_agent, window, JsonBody, QueryMap};
use crate::error::AppError;
use crate::models::{FindMessagesOptions, Message, NewMessage, Page};
use crate::response::{success, success_with, ApiResponse};
use crate::schema::MESSAGES;
use crate::service::{MessagesService, RequestValidator};
use crate::state::AppState;
use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct MessageBody {
    pub name: Option<String>,
    pub email: Option<String>,
    pub subject: Option<String>,
    pub content: Option<String>,
    pub locale: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UnreadCount {
    pub count: i64,
}

fn not_found() -> AppError {
    AppError::NotFound("message not found".into())
}

pub async fn list_messages(
    State(state): State<AppState>,
    Query(q): Query<QueryMap>,
) -> Result<ApiResponse<Page<Message>>, AppError> {
    let options = FindMessagesOptions {
        window: window(&q),
        is_read: bool_param(&q, "isRead"),
    };
    Ok(success(MessagesService::find_all(&state.pool, &options).await?))
}

/// Public contact form. Client address and user agent come from the request headers.
pub async fn create_message(
    State(state): State<AppState>,
    headers: HeaderMap,
    JsonBody(body): JsonBody<MessageBody>,
) -> Result<ApiResponse<Message>, AppError> {
    RequestValidator::validate(
        &MESSAGES,
        &[
            ("name", body.name.as_deref()),
            ("email", body.email.as_deref()),
            ("subject", body.subject.as_deref()),
            ("content", body.content.as_deref()),
            ("locale", body.locale.as_deref()),
        ],
    )?;
    let data = NewMessage {
        name: body.name.unwrap_or_default(),
        email: body.email.unwrap_or_default(),
        subject: body.subject,
        content: body.content.unwrap_or_default(),
        ip_address: client_ip(&headers),
        user_agent: user_agent(&headers),
        locale: body.locale,
    };
    Ok(success(MessagesService::create(&state.pool, data).await?))
}

pub async fn unread_count(State(state): State<AppState>) -> Result<ApiResponse<UnreadCount>, AppError> {
    let count = MessagesService::unread_count(&state.pool).await?;
    Ok(success(UnreadCount { count }))
}

pub async fn get_message(State(state): State<AppState>, Path(id): Path<String>) -> Result<ApiResponse<Message>, AppError> {
    let id = parse_id(&id, "message")?;
    let message = MessagesService::find_by_id(&state.pool, id).await?.ok_or_else(not_found)?;
    Ok(success(message))
}

pub async fn mark_message_read(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ApiResponse<Message>, AppError> {
    let id = parse_id(&id, "message")?;
    let message = MessagesService::mark_as_read(&state.pool, id).await?.ok_or_else(not_found)?;
    Ok(success(message))
}

pub async fn delete_message(State(state): State<AppState>, Path(id): Path<String>) -> Result<ApiResponse<()>, AppError> {
    let id = parse_id(&id, "message")?;
    if !MessagesService::delete(&state.pool, id).await? {
        return Err(not_found());
    }
    Ok(success_with((), "message deleted"))
}
