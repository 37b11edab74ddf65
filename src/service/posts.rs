//! Posts: filtered listing, lookups, create/update/delete, view counting and publishing.

use super::crud::{execute, fetch_page, query_one, query_optional};
use crate::error::AppError;
use crate::models::{FindPostsOptions, NewPost, Page, Post, PostPatch, PublishedAtChange, STATUS_PUBLISHED};
use crate::schema::POSTS;
use crate::sql::{delete, insert, select_one, update, Assignment, Filter, OrderBy, PgBindValue};
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

pub struct PostsService;

impl PostsService {
    /// Newest first. Only the filters that are set narrow the result.
    pub async fn find_all(pool: &PgPool, options: &FindPostsOptions) -> Result<Page<Post>, AppError> {
        let filter = Filter::new()
            .eq_opt("status", options.status.clone())
            .eq_opt("author_id", options.author_id)
            .contains_opt("title", options.search.as_deref());
        fetch_page(pool, &POSTS, &filter, &[OrderBy::Desc("created_at")], options.window).await
    }

    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Post>, AppError> {
        query_optional(pool, select_one(&POSTS, "id", id)).await
    }

    pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Post>, AppError> {
        query_optional(pool, select_one(&POSTS, "slug", slug)).await
    }

    pub async fn create(pool: &PgPool, data: NewPost) -> Result<Post, AppError> {
        let q = insert(
            &POSTS,
            vec![
                ("id", Uuid::new_v4().into()),
                ("title", data.title.into()),
                ("slug", data.slug.into()),
                ("content", data.content.into()),
                ("excerpt", data.excerpt.into()),
                ("cover_image", data.cover_image.into()),
                ("status", data.status.into()),
                ("published_at", data.published_at.into()),
                ("author_id", data.author_id.into()),
                ("meta_title", data.meta_title.into()),
                ("meta_description", data.meta_description.into()),
                ("meta_keywords", data.meta_keywords.into()),
            ],
        );
        let post: Post = query_one(pool, q).await?;
        tracing::info!(post_id = %post.id, slug = %post.slug, "post created");
        Ok(post)
    }

    /// Single conditional UPDATE ... RETURNING; `None` when no row has this id.
    pub async fn update(pool: &PgPool, id: Uuid, patch: PostPatch) -> Result<Option<Post>, AppError> {
        let assignments = patch_assignments(patch);
        query_optional(pool, update(&POSTS, id, &assignments)).await
    }

    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, AppError> {
        let affected = execute(pool, delete(&POSTS, id)).await?;
        Ok(affected > 0)
    }

    /// Atomic `view_count + 1`. Missing ids are ignored.
    pub async fn increment_view_count(pool: &PgPool, id: Uuid) -> Result<(), AppError> {
        let q = update(&POSTS, id, &[Assignment::Increment("view_count")]);
        execute(pool, q).await?;
        Ok(())
    }

    /// Mark published. `published_at` is only filled the first time.
    pub async fn publish(pool: &PgPool, id: Uuid, at: DateTime<Utc>) -> Result<Option<Post>, AppError> {
        let patch = PostPatch {
            status: Some(STATUS_PUBLISHED.to_string()),
            published_at: PublishedAtChange::FillIfUnset { at, otherwise: None },
            ..Default::default()
        };
        Self::update(pool, id, patch).await
    }
}

fn patch_assignments(patch: PostPatch) -> Vec<Assignment> {
    let mut out = Vec::new();
    let fields = [
        ("title", patch.title),
        ("slug", patch.slug),
        ("content", patch.content),
        ("excerpt", patch.excerpt),
        ("cover_image", patch.cover_image),
        ("status", patch.status),
        ("meta_title", patch.meta_title),
        ("meta_description", patch.meta_description),
        ("meta_keywords", patch.meta_keywords),
    ];
    for (col, value) in fields {
        if let Some(v) = value {
            out.push(Assignment::Set(col, v.into()));
        }
    }
    match patch.published_at {
        PublishedAtChange::Keep => {}
        PublishedAtChange::Set(at) => out.push(Assignment::Set("published_at", at.into())),
        PublishedAtChange::FillIfUnset { at, otherwise } => out.push(Assignment::FillNull {
            column: "published_at",
            fill: at.into(),
            otherwise: PgBindValue::from(otherwise),
        }),
    }
    out.push(Assignment::Now("updated_at"));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::test_pool;
    use chrono::Duration;

    #[test]
    fn empty_patch_still_touches_updated_at() {
        let a = patch_assignments(PostPatch::default());
        assert_eq!(a.len(), 1);
        assert_eq!(a[0].column(), "updated_at");
    }

    #[test]
    fn patch_sets_only_present_fields() {
        let patch = PostPatch {
            title: Some("T".into()),
            status: Some("draft".into()),
            ..Default::default()
        };
        let cols: Vec<_> = patch_assignments(patch).iter().map(|a| a.column()).collect();
        assert_eq!(cols, vec!["title", "status", "updated_at"]);
    }

    fn new_post(slug: &str) -> NewPost {
        NewPost {
            title: format!("Post {slug}"),
            slug: slug.to_string(),
            content: Some("body".into()),
            status: "draft".into(),
            ..Default::default()
        }
    }

    fn unique_slug(prefix: &str) -> String {
        format!("{}-{}", prefix, Uuid::new_v4().simple())
    }

    #[tokio::test]
    async fn create_then_find_returns_equal_record() {
        let Some(pool) = test_pool().await else { return };
        let created = PostsService::create(&pool, new_post(&unique_slug("create"))).await.unwrap();
        assert!(!created.id.is_nil());
        assert_eq!(created.view_count, 0);
        assert!(created.published_at.is_none());
        let found = PostsService::find_by_id(&pool, created.id).await.unwrap();
        assert_eq!(found, Some(created.clone()));
        let by_slug = PostsService::find_by_slug(&pool, &created.slug).await.unwrap();
        assert_eq!(by_slug, Some(created));
    }

    #[tokio::test]
    async fn delete_reports_whether_a_row_went_away() {
        let Some(pool) = test_pool().await else { return };
        assert!(!PostsService::delete(&pool, Uuid::new_v4()).await.unwrap());
        let post = PostsService::create(&pool, new_post(&unique_slug("delete"))).await.unwrap();
        assert!(PostsService::delete(&pool, post.id).await.unwrap());
        assert!(PostsService::find_by_id(&pool, post.id).await.unwrap().is_none());
        assert!(!PostsService::delete(&pool, post.id).await.unwrap());
    }

    #[tokio::test]
    async fn publish_sets_timestamp_once() {
        let Some(pool) = test_pool().await else { return };
        let post = PostsService::create(&pool, new_post(&unique_slug("publish"))).await.unwrap();
        let first_at = Utc::now();
        let published = PostsService::publish(&pool, post.id, first_at).await.unwrap().unwrap();
        assert_eq!(published.status, STATUS_PUBLISHED);
        let stamped = published.published_at.unwrap();
        assert!(published.updated_at >= post.updated_at);

        let again = PostsService::publish(&pool, post.id, first_at + Duration::hours(1))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(again.published_at, Some(stamped));
    }

    #[tokio::test]
    async fn cached_insert_accepts_values_after_nulls() {
        let Some(pool) = test_pool().await else { return };
        let draft = PostsService::create(&pool, new_post(&unique_slug("cache-draft"))).await.unwrap();
        assert!(draft.published_at.is_none() && draft.author_id.is_none());

        let author = Uuid::new_v4();
        crate::service::ProfilesService::ensure(&pool, author).await.unwrap();
        let at = Utc::now();
        let mut data = new_post(&unique_slug("cache-published"));
        data.status = STATUS_PUBLISHED.into();
        data.published_at = Some(at);
        data.author_id = Some(author);
        let published = PostsService::create(&pool, data).await.unwrap();
        assert_eq!(published.author_id, Some(author));
        assert_eq!(published.published_at.map(|t| t.timestamp_micros()), Some(at.timestamp_micros()));

        // Same UPDATE text, first with a null `otherwise`, then with a value.
        let republish = |otherwise| PostPatch {
            status: Some(STATUS_PUBLISHED.into()),
            published_at: PublishedAtChange::FillIfUnset { at: Utc::now(), otherwise },
            ..Default::default()
        };
        PostsService::update(&pool, draft.id, republish(None)).await.unwrap().unwrap();
        let moved = at - Duration::days(2);
        let post = PostsService::update(&pool, draft.id, republish(Some(moved))).await.unwrap().unwrap();
        assert_eq!(post.published_at.map(|t| t.timestamp_micros()), Some(moved.timestamp_micros()));
    }

    #[tokio::test]
    async fn update_of_missing_post_is_none() {
        let Some(pool) = test_pool().await else { return };
        let patch = PostPatch { title: Some("x".into()), ..Default::default() };
        assert!(PostsService::update(&pool, Uuid::new_v4(), patch).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn view_count_increments() {
        let Some(pool) = test_pool().await else { return };
        let post = PostsService::create(&pool, new_post(&unique_slug("views"))).await.unwrap();
        PostsService::increment_view_count(&pool, post.id).await.unwrap();
        PostsService::increment_view_count(&pool, post.id).await.unwrap();
        let post = PostsService::find_by_id(&pool, post.id).await.unwrap().unwrap();
        assert_eq!(post.view_count, 2);
    }

    #[tokio::test]
    async fn find_all_filters_and_orders_newest_first() {
        let Some(pool) = test_pool().await else { return };
        let marker = Uuid::new_v4().simple().to_string();
        for i in 0..3 {
            let mut data = new_post(&unique_slug("list"));
            data.title = format!("{marker} {i}");
            PostsService::create(&pool, data).await.unwrap();
        }
        let options = FindPostsOptions {
            search: Some(marker.to_uppercase()),
            window: crate::models::Window { offset: 0, limit: 2 },
            ..Default::default()
        };
        // Rows written by other tests can land between the two reads; the markers keep
        // this filter private, so page and total agree here.
        let page = PostsService::find_all(&pool, &options).await.unwrap();
        assert_eq!(page.total, 3);
        assert_eq!(page.items.len(), 2);
        assert!(page.items[0].created_at >= page.items[1].created_at);

        let none = FindPostsOptions {
            search: Some(marker),
            status: Some(STATUS_PUBLISHED.into()),
            ..Default::default()
        };
        assert_eq!(PostsService::find_all(&pool, &none).await.unwrap().total, 0);
    }
}
