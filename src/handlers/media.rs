//! Media metadata handlers. Uploading the bytes is outside this API.

use super::common::{parse_id, text_param, uuid_param, window, JsonBody, QueryMap};
use crate::error::AppError;
use crate::extractors::CurrentUser;
use crate::models::{FindMediaOptions, Media, MediaPatch, NewMedia, Page};
use crate::response::{success, success_with, ApiResponse};
use crate::schema::MEDIA;
use crate::service::{MediaService, ProfilesService, RequestValidator};
use crate::state::AppState;
use axum::extract::{Path, Query, State};

fn not_found() -> AppError {
    AppError::NotFound("media not found".into())
}

fn check_dimensions(width: Option<i32>, height: Option<i32>, size: Option<i32>) -> Result<(), AppError> {
    for (name, value) in [("width", width), ("height", height), ("size", size)] {
        if value.is_some_and(|v| v < 0) {
            return Err(AppError::Validation(format!("{name} must not be negative")));
        }
    }
    Ok(())
}

pub async fn list_media(
    State(state): State<AppState>,
    Query(q): Query<QueryMap>,
) -> Result<ApiResponse<Page<Media>>, AppError> {
    let options = FindMediaOptions {
        window: window(&q),
        uploaded_by: uuid_param(&q, "uploadedBy")?,
        mime_prefix: text_param(&q, "mimeType"),
    };
    Ok(success(MediaService::find_all(&state.pool, &options).await?))
}

pub async fn get_media(State(state): State<AppState>, Path(id): Path<String>) -> Result<ApiResponse<Media>, AppError> {
    let id = parse_id(&id, "media")?;
    let media = MediaService::find_by_id(&state.pool, id).await?.ok_or_else(not_found)?;
    Ok(success(media))
}

/// Records an already stored file. The uploader is the signed-in user, if any.
pub async fn create_media(
    State(state): State<AppState>,
    CurrentUser(session): CurrentUser,
    JsonBody(mut body): JsonBody<NewMedia>,
) -> Result<ApiResponse<Media>, AppError> {
    RequestValidator::validate(
        &MEDIA,
        &[
            ("filename", Some(body.filename.as_str())),
            ("original_name", body.original_name.as_deref()),
            ("path", Some(body.path.as_str())),
            ("mime_type", body.mime_type.as_deref()),
            ("alt_text", body.alt_text.as_deref()),
        ],
    )?;
    check_dimensions(body.width, body.height, body.size)?;
    body.uploaded_by = session.map(|s| s.user_id);
    if let Some(id) = body.uploaded_by {
        ProfilesService::ensure(&state.pool, id).await?;
    }
    Ok(success(MediaService::create(&state.pool, body).await?))
}

pub async fn update_media(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(body): JsonBody<MediaPatch>,
) -> Result<ApiResponse<Media>, AppError> {
    let id = parse_id(&id, "media")?;
    RequestValidator::validate_partial(
        &MEDIA,
        &[("original_name", body.original_name.as_deref()), ("alt_text", body.alt_text.as_deref())],
    )?;
    check_dimensions(body.width, body.height, None)?;
    let media = MediaService::update(&state.pool, id, body).await?.ok_or_else(not_found)?;
    Ok(success(media))
}

pub async fn delete_media(State(state): State<AppState>, Path(id): Path<String>) -> Result<ApiResponse<()>, AppError> {
    let id = parse_id(&id, "media")?;
    if !MediaService::delete(&state.pool, id).await? {
        return Err(not_found());
    }
    Ok(success_with((), "media deleted"))
}
