//! Pool construction and database bootstrap.

use crate::config::AppConfig;
use crate::error::{AppError, ConfigError};
use crate::sql::quoted;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{ConnectOptions, PgPool};
use std::str::FromStr;

fn connect_options(config: &AppConfig) -> Result<PgConnectOptions, AppError> {
    let opts = PgConnectOptions::from_str(&config.database_url).map_err(|e| ConfigError::Invalid {
        key: "DATABASE_URL",
        value: e.to_string(),
    })?;
    Ok(opts.ssl_mode(config.ssl_mode))
}

pub async fn connect(config: &AppConfig) -> Result<PgPool, AppError> {
    let opts = connect_options(config)?;
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect_with(opts)
        .await?;
    tracing::info!(max_connections = config.max_connections, "database pool ready");
    Ok(pool)
}

/// Create the target database through the `postgres` maintenance database if it is missing.
pub async fn ensure_database_exists(config: &AppConfig) -> Result<(), AppError> {
    let opts = connect_options(config)?;
    let db_name = match opts.get_database() {
        Some(name) if !name.is_empty() && name != "postgres" => name.to_string(),
        _ => return Ok(()),
    };
    let mut conn = opts.database("postgres").connect().await?;
    let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
        .bind(&db_name)
        .fetch_one(&mut conn)
        .await?;
    if !exists {
        sqlx::query(&format!("CREATE DATABASE {}", quoted(&db_name)))
            .execute(&mut conn)
            .await?;
        tracing::info!(database = %db_name, "database created");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(url: &str) -> AppConfig {
        AppConfig::from_lookup(|key| (key == "DATABASE_URL").then(|| url.to_string())).unwrap()
    }

    #[test]
    fn bad_url_is_a_config_error() {
        let err = connect_options(&config("not a url")).unwrap_err();
        assert!(matches!(err, AppError::Config(ConfigError::Invalid { key: "DATABASE_URL", .. })));
    }

    #[test]
    fn database_name_comes_from_path() {
        let opts = connect_options(&config("postgres://u:p@localhost:5432/inkwell")).unwrap();
        assert_eq!(opts.get_database(), Some("inkwell"));
    }
}
