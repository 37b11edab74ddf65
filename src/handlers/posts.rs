//! Post handlers.

use super::common::{parse_id, text_param, uuid_param, window, JsonBody, QueryMap};
use crate::error::AppError;
use crate::extractors::CurrentUser;
use crate::models::{FindPostsOptions, NewPost, Page, Post, PostPatch, PublishedAtChange, STATUS_DRAFT, STATUS_PUBLISHED};
use crate::response::{success, success_with, ApiResponse};
use crate::schema::POSTS;
use crate::service::{PostsService, ProfilesService, RequestValidator};
use crate::state::AppState;
use axum::extract::{Path, Query, State};
use chrono::{DateTime, Utc};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostBody {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub content: Option<String>,
    pub excerpt: Option<String>,
    pub cover_image: Option<String>,
    pub status: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    pub meta_keywords: Option<String>,
}

impl PostBody {
    fn fields(&self) -> [(&'static str, Option<&str>); 9] {
        [
            ("title", self.title.as_deref()),
            ("slug", self.slug.as_deref()),
            ("content", self.content.as_deref()),
            ("excerpt", self.excerpt.as_deref()),
            ("cover_image", self.cover_image.as_deref()),
            ("status", self.status.as_deref()),
            ("meta_title", self.meta_title.as_deref()),
            ("meta_description", self.meta_description.as_deref()),
            ("meta_keywords", self.meta_keywords.as_deref()),
        ]
    }
}

fn not_found() -> AppError {
    AppError::NotFound("post not found".into())
}

pub async fn list_posts(
    State(state): State<AppState>,
    Query(q): Query<QueryMap>,
) -> Result<ApiResponse<Page<Post>>, AppError> {
    let options = FindPostsOptions {
        window: window(&q),
        status: text_param(&q, "status"),
        author_id: uuid_param(&q, "authorId")?,
        search: text_param(&q, "search"),
    };
    Ok(success(PostsService::find_all(&state.pool, &options).await?))
}

pub async fn get_post(State(state): State<AppState>, Path(id): Path<String>) -> Result<ApiResponse<Post>, AppError> {
    let id = parse_id(&id, "post")?;
    let post = PostsService::find_by_id(&state.pool, id).await?.ok_or_else(not_found)?;
    Ok(success(post))
}

/// Public read by slug. Counts a view without holding up the response.
pub async fn get_post_by_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<ApiResponse<Post>, AppError> {
    let post = PostsService::find_by_slug(&state.pool, slug.trim()).await?.ok_or_else(not_found)?;
    let pool = state.pool.clone();
    let id = post.id;
    tokio::spawn(async move {
        if let Err(e) = PostsService::increment_view_count(&pool, id).await {
            tracing::warn!(post_id = %id, error = %e, "view count update failed");
        }
    });
    Ok(success(post))
}

/// Status defaults to draft. A post created as published is stamped now unless the body
/// names a publish time.
pub async fn create_post(
    State(state): State<AppState>,
    CurrentUser(session): CurrentUser,
    JsonBody(body): JsonBody<PostBody>,
) -> Result<ApiResponse<Post>, AppError> {
    RequestValidator::validate(&POSTS, &body.fields())?;
    let author_id = session.map(|s| s.user_id);
    if let Some(id) = author_id {
        ProfilesService::ensure(&state.pool, id).await?;
    }
    let status = body.status.unwrap_or_else(|| STATUS_DRAFT.to_string());
    let published_at = if status == STATUS_PUBLISHED {
        Some(body.published_at.unwrap_or_else(Utc::now))
    } else {
        body.published_at
    };
    let data = NewPost {
        title: body.title.unwrap_or_default(),
        slug: body.slug.unwrap_or_default(),
        content: body.content,
        excerpt: body.excerpt,
        cover_image: body.cover_image,
        status,
        published_at,
        author_id,
        meta_title: body.meta_title,
        meta_description: body.meta_description,
        meta_keywords: body.meta_keywords,
    };
    Ok(success(PostsService::create(&state.pool, data).await?))
}

pub async fn update_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(body): JsonBody<PostBody>,
) -> Result<ApiResponse<Post>, AppError> {
    let id = parse_id(&id, "post")?;
    RequestValidator::validate_partial(&POSTS, &body.fields())?;
    let patch = post_patch(body, Utc::now());
    let post = PostsService::update(&state.pool, id, patch).await?.ok_or_else(not_found)?;
    Ok(success(post))
}

/// Publishing through an update stamps `now` only when the post has never been published.
fn post_patch(body: PostBody, now: DateTime<Utc>) -> PostPatch {
    let published_at = match (body.status.as_deref(), body.published_at) {
        (Some(STATUS_PUBLISHED), otherwise) => PublishedAtChange::FillIfUnset { at: now, otherwise },
        (_, Some(at)) => PublishedAtChange::Set(at),
        (_, None) => PublishedAtChange::Keep,
    };
    PostPatch {
        title: body.title,
        slug: body.slug,
        content: body.content,
        excerpt: body.excerpt,
        cover_image: body.cover_image,
        status: body.status,
        published_at,
        meta_title: body.meta_title,
        meta_description: body.meta_description,
        meta_keywords: body.meta_keywords,
    }
}

pub async fn publish_post(State(state): State<AppState>, Path(id): Path<String>) -> Result<ApiResponse<Post>, AppError> {
    let id = parse_id(&id, "post")?;
    let post = PostsService::publish(&state.pool, id, Utc::now()).await?.ok_or_else(not_found)?;
    Ok(success_with(post, "post published"))
}

pub async fn delete_post(State(state): State<AppState>, Path(id): Path<String>) -> Result<ApiResponse<()>, AppError> {
    let id = parse_id(&id, "post")?;
    if !PostsService::delete(&state.pool, id).await? {
        return Err(not_found());
    }
    Ok(success_with((), "post deleted"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn publishing_update_fills_only_if_unset() {
        let now = Utc::now();
        let body = PostBody { status: Some("published".into()), ..Default::default() };
        assert_eq!(
            post_patch(body, now).published_at,
            PublishedAtChange::FillIfUnset { at: now, otherwise: None }
        );
    }

    #[test]
    fn explicit_publish_time_without_publishing_is_set() {
        let now = Utc::now();
        let at = now - chrono::Duration::days(1);
        let body = PostBody { status: Some("scheduled".into()), published_at: Some(at), ..Default::default() };
        assert_eq!(post_patch(body, now).published_at, PublishedAtChange::Set(at));
        assert_eq!(post_patch(PostBody::default(), now).published_at, PublishedAtChange::Keep);
    }
}
