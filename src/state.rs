//! Shared application state for all routes.

use crate::auth::{IdentityProvider, JwtIdentityProvider};
use crate::config::AppConfig;
use sqlx::PgPool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    /// `None` when no identity provider is configured; every request is anonymous.
    pub identity: Option<Arc<dyn IdentityProvider>>,
}

impl AppState {
    pub fn new(pool: PgPool, config: &AppConfig) -> Self {
        let identity = config
            .jwt_secret
            .as_deref()
            .map(|secret| Arc::new(JwtIdentityProvider::new(secret)) as Arc<dyn IdentityProvider>);
        AppState { pool, identity }
    }
}
