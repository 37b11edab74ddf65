//! Input coercion shared by the resource handlers.

use crate::error::AppError;
use crate::models::{Window, DEFAULT_LIMIT};
use axum::extract::FromRequest;
use axum::http::HeaderMap;
use std::collections::HashMap;
use uuid::Uuid;

pub const MAX_LIMIT: i64 = 100;

pub type QueryMap = HashMap<String, String>;

/// JSON body whose rejection renders as a 400 envelope.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct JsonBody<T>(pub T);

/// `limit`: missing, unparsable or non-positive → 20, capped at 100.
/// `offset`: missing, unparsable or negative → 0.
pub fn window(q: &QueryMap) -> Window {
    let limit = int_param(q, "limit").filter(|n| *n > 0).unwrap_or(DEFAULT_LIMIT);
    let offset = int_param(q, "offset").filter(|n| *n >= 0).unwrap_or(0);
    Window {
        offset,
        limit: limit.min(MAX_LIMIT),
    }
}

fn int_param(q: &QueryMap, key: &str) -> Option<i64> {
    q.get(key).and_then(|v| v.trim().parse().ok())
}

/// Trimmed, non-empty text parameter.
pub fn text_param(q: &QueryMap, key: &str) -> Option<String> {
    q.get(key).map(|v| v.trim()).filter(|v| !v.is_empty()).map(String::from)
}

/// Only the literal strings `true` and `false` filter.
pub fn bool_param(q: &QueryMap, key: &str) -> Option<bool> {
    match q.get(key).map(String::as_str) {
        Some("true") => Some(true),
        Some("false") => Some(false),
        _ => None,
    }
}

/// Optional uuid filter; a malformed value is a 400.
pub fn uuid_param(q: &QueryMap, key: &str) -> Result<Option<Uuid>, AppError> {
    match text_param(q, key) {
        Some(v) => Uuid::parse_str(&v)
            .map(Some)
            .map_err(|_| AppError::Validation(format!("{key} must be a uuid"))),
        None => Ok(None),
    }
}

/// Blank or malformed ids cannot name a row, so both are 404s.
pub fn parse_id(raw: &str, resource: &str) -> Result<Uuid, AppError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(AppError::NotFound(format!("{resource} id is required")));
    }
    Uuid::parse_str(raw).map_err(|_| AppError::NotFound(format!("{resource} not found")))
}

/// First hop of `x-forwarded-for`, else `x-real-ip`.
pub fn client_ip(headers: &HeaderMap) -> Option<String> {
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty());
    forwarded
        .or_else(|| {
            headers
                .get("x-real-ip")
                .and_then(|v| v.to_str().ok())
                .map(str::trim)
                .filter(|v| !v.is_empty())
        })
        .map(String::from)
}

pub fn user_agent(headers: &HeaderMap) -> Option<String> {
    headers
        .get(axum::http::header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(String::from)
}
