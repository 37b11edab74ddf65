//! Tag handlers.

use super::common::{parse_id, text_param, window, JsonBody, QueryMap};
use crate::error::AppError;
use crate::models::{FindTagsOptions, NewTag, Page, Tag, TagPatch};
use crate::response::{success, success_with, ApiResponse};
use crate::schema::TAGS;
use crate::service::{RequestValidator, TagsService};
use crate::state::AppState;
use axum::extract::{Path, Query, State};

fn not_found() -> AppError {
    AppError::NotFound("tag not found".into())
}

pub async fn list_tags(
    State(state): State<AppState>,
    Query(q): Query<QueryMap>,
) -> Result<ApiResponse<Page<Tag>>, AppError> {
    let options = FindTagsOptions {
        window: window(&q),
        search: text_param(&q, "search"),
    };
    Ok(success(TagsService::find_all(&state.pool, &options).await?))
}

pub async fn get_tag(State(state): State<AppState>, Path(id): Path<String>) -> Result<ApiResponse<Tag>, AppError> {
    let id = parse_id(&id, "tag")?;
    let tag = TagsService::find_by_id(&state.pool, id).await?.ok_or_else(not_found)?;
    Ok(success(tag))
}

pub async fn get_tag_by_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<ApiResponse<Tag>, AppError> {
    let tag = TagsService::find_by_slug(&state.pool, slug.trim()).await?.ok_or_else(not_found)?;
    Ok(success(tag))
}

pub async fn create_tag(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<TagPatch>,
) -> Result<ApiResponse<Tag>, AppError> {
    RequestValidator::validate(&TAGS, &[("name", body.name.as_deref()), ("slug", body.slug.as_deref())])?;
    let data = NewTag {
        name: body.name.unwrap_or_default(),
        slug: body.slug.unwrap_or_default(),
    };
    Ok(success(TagsService::create(&state.pool, data).await?))
}

pub async fn update_tag(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(body): JsonBody<TagPatch>,
) -> Result<ApiResponse<Tag>, AppError> {
    let id = parse_id(&id, "tag")?;
    RequestValidator::validate_partial(&TAGS, &[("name", body.name.as_deref()), ("slug", body.slug.as_deref())])?;
    let tag = TagsService::update(&state.pool, id, body).await?.ok_or_else(not_found)?;
    Ok(success(tag))
}

pub async fn delete_tag(State(state): State<AppState>, Path(id): Path<String>) -> Result<ApiResponse<()>, AppError> {
    let id = parse_id(&id, "tag")?;
    if !TagsService::delete(&state.pool, id).await? {
        return Err(not_found());
    }
    Ok(success_with((), "tag deleted"))
}
