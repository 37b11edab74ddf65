//! Runtime configuration from environment variables.

use crate::error::ConfigError;
use sqlx::postgres::PgSslMode;
use std::net::SocketAddr;
use std::str::FromStr;

pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_BODY_LIMIT_BYTES: usize = 1024 * 1024;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub max_connections: u32,
    pub ssl_mode: PgSslMode,
    pub bind_addr: SocketAddr,
    pub body_limit_bytes: usize,
    /// Enables bearer-token sessions when set.
    pub jwt_secret: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let database_url = get("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;
        let max_connections = parse_or(get("DATABASE_MAX_CONNECTIONS"), "DATABASE_MAX_CONNECTIONS", DEFAULT_MAX_CONNECTIONS)?;
        if max_connections == 0 {
            return Err(ConfigError::Invalid {
                key: "DATABASE_MAX_CONNECTIONS",
                value: "0".into(),
            });
        }
        let ssl_mode = parse_or(get("DATABASE_SSL_MODE"), "DATABASE_SSL_MODE", PgSslMode::Prefer)?;
        let bind_addr = match get("BIND_ADDR") {
            Some(v) => v.parse().map_err(|_| ConfigError::Invalid { key: "BIND_ADDR", value: v })?,
            None => DEFAULT_BIND_ADDR.parse().map_err(|_| ConfigError::Invalid {
                key: "BIND_ADDR",
                value: DEFAULT_BIND_ADDR.into(),
            })?,
        };
        let body_limit_bytes = parse_or(get("BODY_LIMIT_BYTES"), "BODY_LIMIT_BYTES", DEFAULT_BODY_LIMIT_BYTES)?;

        Ok(AppConfig {
            database_url,
            max_connections,
            ssl_mode,
            bind_addr,
            body_limit_bytes,
            jwt_secret: get("AUTH_JWT_SECRET"),
        })
    }
}

fn parse_or<T: FromStr>(raw: Option<String>, key: &'static str, default: T) -> Result<T, ConfigError> {
    match raw {
        Some(v) => v.parse().map_err(|_| ConfigError::Invalid { key, value: v }),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply() {
        let cfg = AppConfig::from_lookup(lookup(&[("DATABASE_URL", "postgres://localhost/cms")])).unwrap();
        assert_eq!(cfg.max_connections, 5);
        assert!(matches!(cfg.ssl_mode, PgSslMode::Prefer));
        assert_eq!(cfg.bind_addr.port(), 3000);
        assert_eq!(cfg.body_limit_bytes, 1_048_576);
        assert!(cfg.jwt_secret.is_none());
    }

    #[test]
    fn database_url_is_required() {
        let err = AppConfig::from_lookup(lookup(&[("DATABASE_URL", "  ")])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("DATABASE_URL")));
    }

    #[test]
    fn overrides_are_parsed() {
        let cfg = AppConfig::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://db/cms"),
            ("DATABASE_MAX_CONNECTIONS", "12"),
            ("DATABASE_SSL_MODE", "require"),
            ("BIND_ADDR", "127.0.0.1:8080"),
            ("AUTH_JWT_SECRET", "s3cret"),
        ]))
        .unwrap();
        assert_eq!(cfg.max_connections, 12);
        assert!(matches!(cfg.ssl_mode, PgSslMode::Require));
        assert_eq!(cfg.bind_addr.to_string(), "127.0.0.1:8080");
        assert_eq!(cfg.jwt_secret.as_deref(), Some("s3cret"));
    }

    #[test]
    fn invalid_values_name_the_key() {
        for (key, value) in [
            ("DATABASE_MAX_CONNECTIONS", "many"),
            ("DATABASE_MAX_CONNECTIONS", "0"),
            ("DATABASE_SSL_MODE", "sometimes"),
            ("BIND_ADDR", "nowhere"),
            ("BODY_LIMIT_BYTES", "-1"),
        ] {
            let err = AppConfig::from_lookup(lookup(&[("DATABASE_URL", "postgres://db/cms"), (key, value)])).unwrap_err();
            assert!(err.to_string().contains(key), "{err}");
        }
    }
}
