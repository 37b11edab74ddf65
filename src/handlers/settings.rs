//! Site settings handlers.

use super::common::JsonBody;
use crate::error::AppError;
use crate::models::Setting;
use crate::response::{success, success_with, ApiResponse};
use crate::schema::SETTINGS;
use crate::service::{RequestValidator, SettingsService};
use crate::state::AppState;
use axum::extract::{Path, State};
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
pub struct SettingBody {
    /// Any JSON value. An explicit `null` is stored as null.
    #[serde(default, deserialize_with = "present")]
    pub value: Option<Value>,
}

/// Distinguishes `{"value": null}` (Some(Null)) from a missing key (None).
fn present<'de, D>(d: D) -> Result<Option<Value>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Value::deserialize(d).map(Some)
}

fn not_found() -> AppError {
    AppError::NotFound("setting not found".into())
}

fn check_key(key: &str) -> Result<&str, AppError> {
    let key = key.trim();
    if key.is_empty() {
        return Err(AppError::NotFound("setting key is required".into()));
    }
    RequestValidator::validate_partial(&SETTINGS, &[("key", Some(key))])?;
    Ok(key)
}

pub async fn list_settings(State(state): State<AppState>) -> Result<ApiResponse<Vec<Setting>>, AppError> {
    Ok(success(SettingsService::find_all(&state.pool).await?))
}

pub async fn get_setting(State(state): State<AppState>, Path(key): Path<String>) -> Result<ApiResponse<Setting>, AppError> {
    let key = check_key(&key)?;
    let setting = SettingsService::find_by_key(&state.pool, key).await?.ok_or_else(not_found)?;
    Ok(success(setting))
}

pub async fn put_setting(
    State(state): State<AppState>,
    Path(key): Path<String>,
    JsonBody(body): JsonBody<SettingBody>,
) -> Result<ApiResponse<Setting>, AppError> {
    let key = check_key(&key)?;
    let value = body.value.ok_or_else(|| AppError::Validation("value is required".into()))?;
    Ok(success(SettingsService::upsert(&state.pool, key, value).await?))
}

pub async fn delete_setting(State(state): State<AppState>, Path(key): Path<String>) -> Result<ApiResponse<()>, AppError> {
    let key = check_key(&key)?;
    if !SettingsService::delete(&state.pool, key).await? {
        return Err(not_found());
    }
    Ok(success_with((), "setting deleted"))
}
