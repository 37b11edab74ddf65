//! DDL generated from the table definitions. Idempotent: tables and indexes use IF NOT EXISTS.

use super::{IndexDef, TableDef, ALL_TABLES};
use crate::error::AppError;
use crate::sql::quoted;
use sqlx::PgPool;

/// CREATE TABLE IF NOT EXISTS for one table.
pub fn create_table_sql(table: &TableDef) -> String {
    let col_defs: Vec<String> = table
        .columns
        .iter()
        .map(|c| {
            let mut def = format!("{} {}", quoted(c.name), c.ty.ddl());
            if c.primary_key {
                def.push_str(" PRIMARY KEY");
            } else if c.not_null {
                def.push_str(" NOT NULL");
            }
            if c.unique {
                def.push_str(" UNIQUE");
            }
            if let Some(d) = c.default {
                def.push_str(" DEFAULT ");
                def.push_str(d);
            }
            if let Some((ref_table, ref_col)) = c.references {
                def.push_str(&format!(" REFERENCES {} ({})", quoted(ref_table), quoted(ref_col)));
            }
            def
        })
        .collect();
    format!(
        "CREATE TABLE IF NOT EXISTS {} (\n  {}\n)",
        quoted(table.name),
        col_defs.join(",\n  ")
    )
}

pub fn create_index_sql(table: &TableDef, index: &IndexDef) -> String {
    let cols: Vec<String> = index.columns.iter().map(|c| quoted(c)).collect();
    format!(
        "CREATE INDEX IF NOT EXISTS {} ON {} ({})",
        quoted(index.name),
        quoted(table.name),
        cols.join(", ")
    )
}

/// Create every table and index in dependency order.
pub async fn apply_schema(pool: &PgPool) -> Result<(), AppError> {
    for table in ALL_TABLES {
        sqlx::query(&create_table_sql(table)).execute(pool).await?;
        for index in table.indexes {
            sqlx::query(&create_index_sql(table, index)).execute(pool).await?;
        }
        tracing::debug!(table = table.name, "table ready");
    }
    tracing::info!(tables = ALL_TABLES.len(), "schema applied");
    Ok(())
}
