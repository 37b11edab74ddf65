//! Declarative table definitions. The SQL builder, request validation and DDL all read from here.

mod ddl;
mod tables;

pub use ddl::{apply_schema, create_index_sql, create_table_sql};
pub use tables::*;

/// PostgreSQL column type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColumnType {
    Uuid,
    Varchar(u32),
    Text,
    Integer,
    Boolean,
    Timestamptz,
    Jsonb,
}

impl ColumnType {
    pub fn ddl(&self) -> String {
        match self {
            ColumnType::Uuid => "UUID".into(),
            ColumnType::Varchar(n) => format!("VARCHAR({})", n),
            ColumnType::Text => "TEXT".into(),
            ColumnType::Integer => "INTEGER".into(),
            ColumnType::Boolean => "BOOLEAN".into(),
            ColumnType::Timestamptz => "TIMESTAMPTZ".into(),
            ColumnType::Jsonb => "JSONB".into(),
        }
    }

    /// Type used in `$n::type` parameter casts.
    pub fn cast(&self) -> &'static str {
        match self {
            ColumnType::Uuid => "uuid",
            ColumnType::Varchar(_) | ColumnType::Text => "text",
            ColumnType::Integer => "integer",
            ColumnType::Boolean => "boolean",
            ColumnType::Timestamptz => "timestamptz",
            ColumnType::Jsonb => "jsonb",
        }
    }

    pub fn max_length(&self) -> Option<usize> {
        match self {
            ColumnType::Varchar(n) => Some(*n as usize),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct ColumnDef {
    pub name: &'static str,
    pub ty: ColumnType,
    pub primary_key: bool,
    pub not_null: bool,
    pub unique: bool,
    /// SQL default expression, emitted verbatim.
    pub default: Option<&'static str>,
    /// (table, column) this column points at. Declarative only, no cascade.
    pub references: Option<(&'static str, &'static str)>,
}

impl ColumnDef {
    pub const fn new(name: &'static str, ty: ColumnType) -> Self {
        ColumnDef {
            name,
            ty,
            primary_key: false,
            not_null: false,
            unique: false,
            default: None,
            references: None,
        }
    }

    pub const fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    pub const fn not_null(mut self) -> Self {
        self.not_null = true;
        self
    }

    pub const fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    pub const fn default_sql(mut self, expr: &'static str) -> Self {
        self.default = Some(expr);
        self
    }

    pub const fn references(mut self, table: &'static str, column: &'static str) -> Self {
        self.references = Some((table, column));
        self
    }

    /// Must be supplied by the caller on insert: not null and nothing fills it in.
    pub fn required(&self) -> bool {
        self.not_null && self.default.is_none() && !self.primary_key
    }
}

#[derive(Clone, Copy, Debug)]
pub struct IndexDef {
    pub name: &'static str,
    pub columns: &'static [&'static str],
}

#[derive(Clone, Copy, Debug)]
pub struct TableDef {
    pub name: &'static str,
    pub columns: &'static [ColumnDef],
    pub indexes: &'static [IndexDef],
}

impl TableDef {
    pub fn column(&self, name: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn primary_key(&self) -> &ColumnDef {
        self.columns
            .iter()
            .find(|c| c.primary_key)
            .unwrap_or(&self.columns[0])
    }

    /// Parameter placeholder for a column, cast to the column's type.
    pub fn placeholder(&self, column: &str, n: u32) -> String {
        match self.column(column) {
            Some(c) => format!("${}::{}", n, c.ty.cast()),
            None => format!("${}", n),
        }
    }
}
