//! Builds parameterized SELECT, COUNT, INSERT, UPDATE, UPSERT and DELETE from table definitions.
//! Identifiers only ever come from `TableDef`; every value is a bound parameter.

use super::PgBindValue;
use crate::schema::TableDef;

/// Quote identifier for PostgreSQL (safe: only from table definitions).
pub fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

#[derive(Debug)]
pub struct QueryBuf {
    pub sql: String,
    pub params: Vec<PgBindValue>,
}

impl QueryBuf {
    fn new() -> Self {
        QueryBuf {
            sql: String::new(),
            params: Vec::new(),
        }
    }

    fn push_param(&mut self, v: PgBindValue) -> u32 {
        self.params.push(v);
        self.params.len() as u32
    }

    /// Bind a value to `column` and return its cast placeholder. Nulls take the column's type.
    fn push_column(&mut self, table: &TableDef, column: &str, v: PgBindValue) -> String {
        let v = match table.column(column) {
            Some(c) => v.typed_for(c.ty),
            None => v,
        };
        let n = self.push_param(v);
        table.placeholder(column, n)
    }
}

/// One predicate of a conjunctive WHERE clause.
#[derive(Clone, Debug)]
pub enum Condition {
    Eq(&'static str, PgBindValue),
    /// Case-insensitive substring match.
    Contains(&'static str, String),
    /// Case-insensitive prefix match.
    StartsWith(&'static str, String),
}

/// Conditions joined with AND. An empty filter matches every row.
#[derive(Clone, Debug, Default)]
pub struct Filter {
    conditions: Vec<Condition>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eq(mut self, column: &'static str, value: impl Into<PgBindValue>) -> Self {
        self.conditions.push(Condition::Eq(column, value.into()));
        self
    }

    /// Adds `column = value` only when a value is given.
    pub fn eq_opt<T: Into<PgBindValue>>(self, column: &'static str, value: Option<T>) -> Self {
        match value {
            Some(v) => self.eq(column, v),
            None => self,
        }
    }

    /// Adds a substring match only for a non-empty term.
    pub fn contains_opt(mut self, column: &'static str, term: Option<&str>) -> Self {
        if let Some(t) = term.filter(|t| !t.is_empty()) {
            self.conditions.push(Condition::Contains(column, t.to_string()));
        }
        self
    }

    pub fn starts_with_opt(mut self, column: &'static str, prefix: Option<&str>) -> Self {
        if let Some(p) = prefix.filter(|p| !p.is_empty()) {
            self.conditions.push(Condition::StartsWith(column, p.to_string()));
        }
        self
    }

    fn write_where(&self, table: &TableDef, q: &mut QueryBuf) -> String {
        let mut parts = Vec::with_capacity(self.conditions.len());
        for cond in &self.conditions {
            match cond {
                Condition::Eq(col, val) => {
                    let p = q.push_column(table, col, val.clone());
                    parts.push(format!("{} = {}", quoted(col), p));
                }
                Condition::Contains(col, term) => {
                    let n = q.push_param(PgBindValue::String(format!("%{}%", escape_like(term))));
                    parts.push(format!("{} ILIKE ${}::text", quoted(col), n));
                }
                Condition::StartsWith(col, prefix) => {
                    let n = q.push_param(PgBindValue::String(format!("{}%", escape_like(prefix))));
                    parts.push(format!("{} ILIKE ${}::text", quoted(col), n));
                }
            }
        }
        if parts.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", parts.join(" AND "))
        }
    }
}

/// LIKE pattern metacharacters are matched literally.
fn escape_like(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

#[derive(Clone, Copy, Debug)]
pub enum OrderBy {
    Asc(&'static str),
    Desc(&'static str),
}

fn order_clause(order: &[OrderBy]) -> String {
    if order.is_empty() {
        return String::new();
    }
    let parts: Vec<String> = order
        .iter()
        .map(|o| match o {
            OrderBy::Asc(c) => format!("{} ASC", quoted(c)),
            OrderBy::Desc(c) => format!("{} DESC", quoted(c)),
        })
        .collect();
    format!(" ORDER BY {}", parts.join(", "))
}

/// Right-hand side of one SET entry.
#[derive(Clone, Debug)]
pub enum Assignment {
    Set(&'static str, PgBindValue),
    /// `col = NOW()`
    Now(&'static str),
    /// `col = col + 1`, atomic in the database.
    Increment(&'static str),
    /// Keep the stored value if there is one, otherwise `fill`. When the stored value is set,
    /// `otherwise` replaces it unless null.
    FillNull {
        column: &'static str,
        fill: PgBindValue,
        otherwise: PgBindValue,
    },
}

impl Assignment {
    pub fn column(&self) -> &'static str {
        match self {
            Assignment::Set(c, _) | Assignment::Now(c) | Assignment::Increment(c) => c,
            Assignment::FillNull { column, .. } => column,
        }
    }

    fn write(&self, table: &TableDef, q: &mut QueryBuf) -> String {
        let col = quoted(self.column());
        match self {
            Assignment::Set(c, v) => {
                let p = q.push_column(table, c, v.clone());
                format!("{} = {}", col, p)
            }
            Assignment::Now(_) => format!("{} = NOW()", col),
            Assignment::Increment(_) => format!("{} = {} + 1", col, col),
            Assignment::FillNull { column, fill, otherwise } => {
                let a = q.push_column(table, column, fill.clone());
                let b = q.push_column(table, column, otherwise.clone());
                format!("{} = CASE WHEN {} IS NULL THEN {} ELSE COALESCE({}, {}) END", col, col, a, b, col)
            }
        }
    }
}

fn column_list(table: &TableDef) -> String {
    table
        .columns
        .iter()
        .map(|c| quoted(c.name))
        .collect::<Vec<_>>()
        .join(", ")
}

/// SELECT one page: filter, order, LIMIT/OFFSET.
pub fn select_page(
    table: &TableDef,
    filter: &Filter,
    order: &[OrderBy],
    limit: Option<i64>,
    offset: Option<i64>,
) -> QueryBuf {
    let mut q = QueryBuf::new();
    let where_clause = filter.write_where(table, &mut q);
    let limit_clause = limit.map(|n| format!(" LIMIT {}", n.max(0))).unwrap_or_default();
    let offset_clause = offset.map(|n| format!(" OFFSET {}", n.max(0))).unwrap_or_default();
    q.sql = format!(
        "SELECT {} FROM {}{}{}{}{}",
        column_list(table),
        quoted(table.name),
        where_clause,
        order_clause(order),
        limit_clause,
        offset_clause
    );
    q
}

/// SELECT count(*) with the same filter a page uses.
pub fn count(table: &TableDef, filter: &Filter) -> QueryBuf {
    let mut q = QueryBuf::new();
    let where_clause = filter.write_where(table, &mut q);
    q.sql = format!("SELECT count(*) FROM {}{}", quoted(table.name), where_clause);
    q
}

/// SELECT the first row where `column = value`.
pub fn select_one(table: &TableDef, column: &'static str, value: impl Into<PgBindValue>) -> QueryBuf {
    let mut q = QueryBuf::new();
    let where_clause = Filter::new().eq(column, value).write_where(table, &mut q);
    q.sql = format!(
        "SELECT {} FROM {}{} LIMIT 1",
        column_list(table),
        quoted(table.name),
        where_clause
    );
    q
}

/// INSERT the given columns; everything else takes its default. RETURNING all columns.
pub fn insert(table: &TableDef, values: Vec<(&'static str, PgBindValue)>) -> QueryBuf {
    let mut q = QueryBuf::new();
    let mut cols = Vec::with_capacity(values.len());
    let mut placeholders = Vec::with_capacity(values.len());
    for (col, val) in values {
        placeholders.push(q.push_column(table, col, val));
        cols.push(quoted(col));
    }
    q.sql = format!(
        "INSERT INTO {} ({}) VALUES ({}) RETURNING {}",
        quoted(table.name),
        cols.join(", "),
        placeholders.join(", "),
        column_list(table)
    );
    q
}

/// INSERT or, on primary-key conflict, overwrite the given columns. RETURNING all columns.
pub fn upsert(table: &TableDef, values: Vec<(&'static str, PgBindValue)>, touch: &[&'static str]) -> QueryBuf {
    let pk = table.primary_key().name;
    let mut updates: Vec<String> = values
        .iter()
        .filter(|(c, _)| *c != pk)
        .map(|(c, _)| format!("{} = EXCLUDED.{}", quoted(c), quoted(c)))
        .collect();
    updates.extend(touch.iter().map(|c| format!("{} = NOW()", quoted(c))));
    let mut q = insert(table, values);
    let returning_at = q.sql.rfind(" RETURNING ").unwrap_or(q.sql.len());
    let returning = q.sql.split_off(returning_at);
    let conflict = if updates.is_empty() {
        format!(" ON CONFLICT ({}) DO NOTHING", quoted(pk))
    } else {
        format!(" ON CONFLICT ({}) DO UPDATE SET {}", quoted(pk), updates.join(", "))
    };
    q.sql.push_str(&conflict);
    q.sql.push_str(&returning);
    q
}

/// UPDATE one row by primary key. RETURNING all columns, so no row means no match.
pub fn update(table: &TableDef, id: impl Into<PgBindValue>, assignments: &[Assignment]) -> QueryBuf {
    let mut q = QueryBuf::new();
    let sets: Vec<String> = assignments.iter().map(|a| a.write(table, &mut q)).collect();
    let pk = table.primary_key().name;
    let id = q.push_column(table, pk, id.into());
    q.sql = format!(
        "UPDATE {} SET {} WHERE {} = {} RETURNING {}",
        quoted(table.name),
        sets.join(", "),
        quoted(pk),
        id,
        column_list(table)
    );
    q
}

/// DELETE one row by primary key.
pub fn delete(table: &TableDef, id: impl Into<PgBindValue>) -> QueryBuf {
    let mut q = QueryBuf::new();
    let pk = table.primary_key().name;
    let id = q.push_column(table, pk, id.into());
    q.sql = format!("DELETE FROM {} WHERE {} = {}", quoted(table.name), quoted(pk), id);
    q
}
