//! Tags: name + unique slug.

use super::crud::{execute, fetch_page, query_one, query_optional};
use crate::error::AppError;
use crate::models::{FindTagsOptions, NewTag, Page, Tag, TagPatch};
use crate::schema::TAGS;
use crate::sql::{delete, insert, select_one, update, Assignment, Filter, OrderBy};
use sqlx::PgPool;
use uuid::Uuid;

pub struct TagsService;

impl TagsService {
    pub async fn find_all(pool: &PgPool, options: &FindTagsOptions) -> Result<Page<Tag>, AppError> {
        let filter = Filter::new().contains_opt("name", options.search.as_deref());
        fetch_page(pool, &TAGS, &filter, &[OrderBy::Desc("created_at")], options.window).await
    }

    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Tag>, AppError> {
        query_optional(pool, select_one(&TAGS, "id", id)).await
    }

    pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Tag>, AppError> {
        query_optional(pool, select_one(&TAGS, "slug", slug)).await
    }

    pub async fn create(pool: &PgPool, data: NewTag) -> Result<Tag, AppError> {
        let q = insert(
            &TAGS,
            vec![
                ("id", Uuid::new_v4().into()),
                ("name", data.name.into()),
                ("slug", data.slug.into()),
            ],
        );
        query_one(pool, q).await
    }

    pub async fn update(pool: &PgPool, id: Uuid, patch: TagPatch) -> Result<Option<Tag>, AppError> {
        let assignments: Vec<Assignment> = [("name", patch.name), ("slug", patch.slug)]
            .into_iter()
            .filter_map(|(col, v)| v.map(|v| Assignment::Set(col, v.into())))
            .collect();
        if assignments.is_empty() {
            return Self::find_by_id(pool, id).await;
        }
        query_optional(pool, update(&TAGS, id, &assignments)).await
    }

    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, AppError> {
        Ok(execute(pool, delete(&TAGS, id)).await? > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::test_pool;

    #[tokio::test]
    async fn duplicate_slug_surfaces_database_error() {
        let Some(pool) = test_pool().await else { return };
        let slug = format!("dup-{}", Uuid::new_v4().simple());
        TagsService::create(&pool, NewTag { name: "One".into(), slug: slug.clone() }).await.unwrap();
        let err = TagsService::create(&pool, NewTag { name: "Two".into(), slug }).await.unwrap_err();
        assert!(matches!(err, AppError::Db(_)));
        assert_eq!(err.code(), 500);
    }

    #[tokio::test]
    async fn search_matches_name_case_insensitively() {
        let Some(pool) = test_pool().await else { return };
        let marker = Uuid::new_v4().simple().to_string();
        let tag = TagsService::create(&pool, NewTag { name: format!("Rust{}", &marker[..8]), slug: format!("t-{marker}") })
            .await
            .unwrap();
        let options = FindTagsOptions { search: Some(format!("rust{}", &marker[..8])), ..Default::default() };
        let page = TagsService::find_all(&pool, &options).await.unwrap();
        assert_eq!(page.items, vec![tag]);
        assert_eq!(page.total, 1);
    }
}
