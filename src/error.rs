//! Typed errors and HTTP mapping onto the response envelope.

use crate::response::ApiResponse;
use axum::{
    extract::rejection::JsonRejection,
    response::{IntoResponse, Response},
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),
    #[error("invalid {key}: '{value}'")]
    Invalid { key: &'static str, value: String },
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    Db(#[from] sqlx::Error),
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Unauthorized(String),
}

impl AppError {
    pub fn code(&self) -> u16 {
        match self {
            AppError::NotFound(_) => 404,
            AppError::Validation(_) | AppError::BadRequest(_) => 400,
            AppError::Unauthorized(_) => 401,
            AppError::Config(_) | AppError::Db(_) => 500,
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let code = self.code();
        if code >= 500 {
            tracing::error!(error = %self, "request failed");
        }
        ApiResponse::<()>::error_with_code(self.to_string(), code).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn codes_follow_error_kind() {
        assert_eq!(AppError::NotFound("x".into()).code(), 404);
        assert_eq!(AppError::Validation("x".into()).code(), 400);
        assert_eq!(AppError::Unauthorized("x".into()).code(), 401);
        assert_eq!(AppError::Db(sqlx::Error::PoolTimedOut).code(), 500);
        assert_eq!(AppError::Config(ConfigError::Missing("DATABASE_URL")).code(), 500);
    }

    #[test]
    fn db_errors_keep_raw_message() {
        let err = AppError::Db(sqlx::Error::PoolTimedOut);
        assert_eq!(err.to_string(), sqlx::Error::PoolTimedOut.to_string());
    }

    #[test]
    fn response_status_mirrors_code() {
        let resp = AppError::NotFound("post not found".into()).into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
