//! Query execution shared by the entity services. Typed rows via `sqlx::FromRow`.

use crate::error::AppError;
use crate::models::{Page, Window};
use crate::schema::TableDef;
use crate::sql::{count, select_page, Filter, OrderBy, QueryBuf};
use sqlx::postgres::PgRow;
use sqlx::{FromRow, PgPool};

/// Fetch one page and the filter's total. Both queries run concurrently on separate
/// connections, so `total` may disagree with the page under concurrent writes.
pub(crate) async fn fetch_page<T>(
    pool: &PgPool,
    table: &TableDef,
    filter: &Filter,
    order: &[OrderBy],
    window: Window,
) -> Result<Page<T>, AppError>
where
    T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    let page_q = select_page(table, filter, order, Some(window.limit), Some(window.offset));
    let count_q = count(table, filter);
    let (items, total) = tokio::try_join!(query_many::<T>(pool, page_q), query_count(pool, count_q))?;
    Ok(Page { items, total })
}

pub(crate) async fn query_many<T>(pool: &PgPool, q: QueryBuf) -> Result<Vec<T>, AppError>
where
    T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    tracing::debug!(sql = %q.sql, params = ?q.params, "query");
    let QueryBuf { sql, params } = q;
    let mut query = sqlx::query_as::<_, T>(&sql);
    for p in params {
        query = query.bind(p);
    }
    Ok(query.fetch_all(pool).await?)
}

pub(crate) async fn query_optional<T>(pool: &PgPool, q: QueryBuf) -> Result<Option<T>, AppError>
where
    T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    tracing::debug!(sql = %q.sql, params = ?q.params, "query");
    let QueryBuf { sql, params } = q;
    let mut query = sqlx::query_as::<_, T>(&sql);
    for p in params {
        query = query.bind(p);
    }
    Ok(query.fetch_optional(pool).await?)
}

/// INSERT ... RETURNING always yields the row.
pub(crate) async fn query_one<T>(pool: &PgPool, q: QueryBuf) -> Result<T, AppError>
where
    T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    tracing::debug!(sql = %q.sql, params = ?q.params, "query");
    let QueryBuf { sql, params } = q;
    let mut query = sqlx::query_as::<_, T>(&sql);
    for p in params {
        query = query.bind(p);
    }
    Ok(query.fetch_one(pool).await?)
}

pub(crate) async fn query_count(pool: &PgPool, q: QueryBuf) -> Result<i64, AppError> {
    tracing::debug!(sql = %q.sql, params = ?q.params, "query");
    let QueryBuf { sql, params } = q;
    let mut query = sqlx::query_scalar::<_, i64>(&sql);
    for p in params {
        query = query.bind(p);
    }
    Ok(query.fetch_one(pool).await?)
}

/// Run a statement, returning the number of affected rows.
pub(crate) async fn execute(pool: &PgPool, q: QueryBuf) -> Result<u64, AppError> {
    tracing::debug!(sql = %q.sql, params = ?q.params, "execute");
    let QueryBuf { sql, params } = q;
    let mut query = sqlx::query(&sql);
    for p in params {
        query = query.bind(p);
    }
    let result = query.execute(pool).await?;
    Ok(result.rows_affected())
}
