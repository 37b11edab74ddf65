//! Category handlers.

use super::common::{parse_id, uuid_param, window, JsonBody, QueryMap};
use crate::error::AppError;
use crate::models::{Category, CategoryPatch, FindCategoriesOptions, NewCategory, Page};
use crate::response::{success, success_with, ApiResponse};
use crate::schema::CATEGORIES;
use crate::service::{CategoriesService, RequestValidator};
use crate::state::AppState;
use axum::extract::{Path, Query, State};

fn not_found() -> AppError {
    AppError::NotFound("category not found".into())
}

fn fields(patch: &CategoryPatch) -> [(&'static str, Option<&str>); 3] {
    [
        ("name", patch.name.as_deref()),
        ("slug", patch.slug.as_deref()),
        ("description", patch.description.as_deref()),
    ]
}

pub async fn list_categories(
    State(state): State<AppState>,
    Query(q): Query<QueryMap>,
) -> Result<ApiResponse<Page<Category>>, AppError> {
    let options = FindCategoriesOptions {
        window: window(&q),
        parent_id: uuid_param(&q, "parentId")?,
    };
    Ok(success(CategoriesService::find_all(&state.pool, &options).await?))
}

pub async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ApiResponse<Category>, AppError> {
    let id = parse_id(&id, "category")?;
    let category = CategoriesService::find_by_id(&state.pool, id).await?.ok_or_else(not_found)?;
    Ok(success(category))
}

pub async fn get_category_by_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<ApiResponse<Category>, AppError> {
    let category = CategoriesService::find_by_slug(&state.pool, slug.trim()).await?.ok_or_else(not_found)?;
    Ok(success(category))
}

/// Body shape is the patch shape; name and slug are then required.
pub async fn create_category(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<CategoryPatch>,
) -> Result<ApiResponse<Category>, AppError> {
    RequestValidator::validate(&CATEGORIES, &fields(&body))?;
    let data = NewCategory {
        name: body.name.unwrap_or_default(),
        slug: body.slug.unwrap_or_default(),
        description: body.description,
        parent_id: body.parent_id,
        sort_order: body.sort_order,
    };
    Ok(success(CategoriesService::create(&state.pool, data).await?))
}

pub async fn update_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(body): JsonBody<CategoryPatch>,
) -> Result<ApiResponse<Category>, AppError> {
    let id = parse_id(&id, "category")?;
    RequestValidator::validate_partial(&CATEGORIES, &fields(&body))?;
    let category = CategoriesService::update(&state.pool, id, body).await?.ok_or_else(not_found)?;
    Ok(success(category))
}

pub async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ApiResponse<()>, AppError> {
    let id = parse_id(&id, "category")?;
    if !CategoriesService::delete(&state.pool, id).await? {
        return Err(not_found());
    }
    Ok(success_with((), "category deleted"))
}
