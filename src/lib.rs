//! Inkwell CMS: REST backend for posts, categories, tags, contact messages, media,
//! site settings and user profiles, backed by PostgreSQL.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod models;
pub mod response;
pub mod routes;
pub mod schema;
pub mod service;
pub mod sql;
pub mod state;

pub use auth::{IdentityProvider, JwtIdentityProvider, Session};
pub use config::AppConfig;
pub use db::{connect, ensure_database_exists};
pub use error::{AppError, ConfigError};
pub use response::ApiResponse;
pub use routes::app;
pub use schema::apply_schema;
pub use state::AppState;
