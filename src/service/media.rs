//! Media metadata rows. File bytes live elsewhere; only the stored path is recorded here.

use super::crud::{execute, fetch_page, query_one, query_optional};
use crate::error::AppError;
use crate::models::{FindMediaOptions, Media, MediaPatch, NewMedia, Page};
use crate::schema::MEDIA;
use crate::sql::{delete, insert, select_one, update, Assignment, Filter, OrderBy};
use sqlx::PgPool;
use uuid::Uuid;

pub struct MediaService;

impl MediaService {
    pub async fn find_all(pool: &PgPool, options: &FindMediaOptions) -> Result<Page<Media>, AppError> {
        let filter = Filter::new()
            .eq_opt("uploaded_by", options.uploaded_by)
            .starts_with_opt("mime_type", options.mime_prefix.as_deref());
        fetch_page(pool, &MEDIA, &filter, &[OrderBy::Desc("created_at")], options.window).await
    }

    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Media>, AppError> {
        query_optional(pool, select_one(&MEDIA, "id", id)).await
    }

    pub async fn create(pool: &PgPool, data: NewMedia) -> Result<Media, AppError> {
        let q = insert(
            &MEDIA,
            vec![
                ("id", Uuid::new_v4().into()),
                ("filename", data.filename.into()),
                ("original_name", data.original_name.into()),
                ("path", data.path.into()),
                ("mime_type", data.mime_type.into()),
                ("size", data.size.into()),
                ("width", data.width.into()),
                ("height", data.height.into()),
                ("alt_text", data.alt_text.into()),
                ("uploaded_by", data.uploaded_by.into()),
            ],
        );
        query_one(pool, q).await
    }

    pub async fn update(pool: &PgPool, id: Uuid, patch: MediaPatch) -> Result<Option<Media>, AppError> {
        let mut assignments = Vec::new();
        if let Some(v) = patch.original_name {
            assignments.push(Assignment::Set("original_name", v.into()));
        }
        if let Some(v) = patch.alt_text {
            assignments.push(Assignment::Set("alt_text", v.into()));
        }
        if let Some(v) = patch.width {
            assignments.push(Assignment::Set("width", v.into()));
        }
        if let Some(v) = patch.height {
            assignments.push(Assignment::Set("height", v.into()));
        }
        if assignments.is_empty() {
            return Self::find_by_id(pool, id).await;
        }
        query_optional(pool, update(&MEDIA, id, &assignments)).await
    }

    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, AppError> {
        Ok(execute(pool, delete(&MEDIA, id)).await? > 0)
    }
}
