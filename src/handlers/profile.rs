//! The signed-in user's own profile.

use super::common::JsonBody;
use crate::error::AppError;
use crate::extractors::RequireUser;
use crate::models::{Profile, ProfilePatch};
use crate::response::{success, ApiResponse};
use crate::schema::PROFILES;
use crate::service::{ProfilesService, RequestValidator};
use crate::state::AppState;
use axum::extract::State;

/// A user who has never saved a profile gets a fresh row.
pub async fn get_my_profile(
    State(state): State<AppState>,
    RequireUser(session): RequireUser,
) -> Result<ApiResponse<Profile>, AppError> {
    if let Some(profile) = ProfilesService::find_by_id(&state.pool, session.user_id).await? {
        return Ok(success(profile));
    }
    let profile = ProfilesService::upsert(&state.pool, session.user_id, ProfilePatch::default()).await?;
    Ok(success(profile))
}

pub async fn update_my_profile(
    State(state): State<AppState>,
    RequireUser(session): RequireUser,
    JsonBody(body): JsonBody<ProfilePatch>,
) -> Result<ApiResponse<Profile>, AppError> {
    RequestValidator::validate_partial(
        &PROFILES,
        &[
            ("username", body.username.as_deref()),
            ("display_name", body.display_name.as_deref()),
            ("avatar_url", body.avatar_url.as_deref()),
            ("bio", body.bio.as_deref()),
        ],
    )?;
    Ok(success(ProfilesService::upsert(&state.pool, session.user_id, body).await?))
}
