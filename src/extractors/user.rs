//! Session from the `Authorization: Bearer` header.

use crate::auth::Session;
use crate::error::AppError;
use crate::response::MSG_UNAUTHORIZED;
use crate::state::AppState;
use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};

/// Optional session. No header means anonymous; a header that does not verify is rejected.
#[derive(Clone, Debug)]
pub struct CurrentUser(pub Option<Session>);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let Some(value) = parts.headers.get(header::AUTHORIZATION) else {
            return Ok(CurrentUser(None));
        };
        let Some(identity) = state.identity.as_ref() else {
            tracing::debug!("authorization header ignored, no identity provider configured");
            return Ok(CurrentUser(None));
        };
        let token = value
            .to_str()
            .ok()
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AppError::Unauthorized(MSG_UNAUTHORIZED.into()))?;
        match identity.get_session(token).await? {
            Some(session) => Ok(CurrentUser(Some(session))),
            None => Err(AppError::Unauthorized(MSG_UNAUTHORIZED.into())),
        }
    }
}

/// Session that must be present.
#[derive(Clone, Debug)]
pub struct RequireUser(pub Session);

#[async_trait]
impl FromRequestParts<AppState> for RequireUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        match CurrentUser::from_request_parts(parts, state).await? {
            CurrentUser(Some(session)) => Ok(RequireUser(session)),
            CurrentUser(None) => Err(AppError::Unauthorized(MSG_UNAUTHORIZED.into())),
        }
    }
}
