//! Key/value site settings. Values are arbitrary JSON.

use super::crud::{execute, query_many, query_one, query_optional};
use crate::error::AppError;
use crate::models::Setting;
use crate::schema::SETTINGS;
use crate::sql::{delete, select_one, select_page, upsert, Filter, OrderBy};
use serde_json::Value;
use sqlx::PgPool;

pub struct SettingsService;

impl SettingsService {
    /// Every setting, ordered by key.
    pub async fn find_all(pool: &PgPool) -> Result<Vec<Setting>, AppError> {
        let q = select_page(&SETTINGS, &Filter::new(), &[OrderBy::Asc("key")], None, None);
        query_many(pool, q).await
    }

    pub async fn find_by_key(pool: &PgPool, key: &str) -> Result<Option<Setting>, AppError> {
        query_optional(pool, select_one(&SETTINGS, "key", key)).await
    }

    /// Insert or overwrite; `updated_at` is refreshed either way.
    pub async fn upsert(pool: &PgPool, key: &str, value: Value) -> Result<Setting, AppError> {
        let q = upsert(&SETTINGS, vec![("key", key.into()), ("value", value.into())], &["updated_at"]);
        let setting: Setting = query_one(pool, q).await?;
        tracing::info!(key = %setting.key, "setting saved");
        Ok(setting)
    }

    pub async fn delete(pool: &PgPool, key: &str) -> Result<bool, AppError> {
        Ok(execute(pool, delete(&SETTINGS, key)).await? > 0)
    }
}
