//! Categories: a flat table with an optional parent pointer and manual sort order.

use super::crud::{execute, fetch_page, query_one, query_optional};
use crate::error::AppError;
use crate::models::{Category, CategoryPatch, FindCategoriesOptions, NewCategory, Page};
use crate::schema::CATEGORIES;
use crate::sql::{delete, insert, select_one, update, Assignment, Filter, OrderBy};
use sqlx::PgPool;
use uuid::Uuid;

pub struct CategoriesService;

impl CategoriesService {
    /// Ordered by `sort_order`, then newest first.
    pub async fn find_all(pool: &PgPool, options: &FindCategoriesOptions) -> Result<Page<Category>, AppError> {
        let filter = Filter::new().eq_opt("parent_id", options.parent_id);
        let order = [OrderBy::Asc("sort_order"), OrderBy::Desc("created_at")];
        fetch_page(pool, &CATEGORIES, &filter, &order, options.window).await
    }

    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Category>, AppError> {
        query_optional(pool, select_one(&CATEGORIES, "id", id)).await
    }

    pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Category>, AppError> {
        query_optional(pool, select_one(&CATEGORIES, "slug", slug)).await
    }

    pub async fn create(pool: &PgPool, data: NewCategory) -> Result<Category, AppError> {
        let q = insert(
            &CATEGORIES,
            vec![
                ("id", Uuid::new_v4().into()),
                ("name", data.name.into()),
                ("slug", data.slug.into()),
                ("description", data.description.into()),
                ("parent_id", data.parent_id.into()),
                ("sort_order", data.sort_order.unwrap_or(0).into()),
            ],
        );
        query_one(pool, q).await
    }

    pub async fn update(pool: &PgPool, id: Uuid, patch: CategoryPatch) -> Result<Option<Category>, AppError> {
        let mut assignments = Vec::new();
        for (col, value) in [("name", patch.name), ("slug", patch.slug), ("description", patch.description)] {
            if let Some(v) = value {
                assignments.push(Assignment::Set(col, v.into()));
            }
        }
        if let Some(parent) = patch.parent_id {
            assignments.push(Assignment::Set("parent_id", parent.into()));
        }
        if let Some(order) = patch.sort_order {
            assignments.push(Assignment::Set("sort_order", order.into()));
        }
        if assignments.is_empty() {
            return Self::find_by_id(pool, id).await;
        }
        query_optional(pool, update(&CATEGORIES, id, &assignments)).await
    }

    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, AppError> {
        Ok(execute(pool, delete(&CATEGORIES, id)).await? > 0)
    }
}
