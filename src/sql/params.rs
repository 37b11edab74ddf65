//! Bind values for dynamically built queries.

use crate::schema::ColumnType;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::encode::{Encode, IsNull};
use sqlx::error::BoxDynError;
use sqlx::postgres::{PgTypeInfo, Postgres};
use sqlx::{Database, Type};
use uuid::Uuid;

/// A value that can be bound to a PostgreSQL query. Each variant declares its own wire type,
/// and the builder casts placeholders to the column type.
///
/// Prepared statements are cached per connection by SQL text, so a parameter slot must declare
/// the same type whether or not the value is null. The builder turns `Null` into `TypedNull`
/// for every column-bound parameter.
#[derive(Clone, Debug, PartialEq)]
pub enum PgBindValue {
    Null,
    TypedNull(ColumnType),
    Bool(bool),
    I32(i32),
    I64(i64),
    F64(f64),
    String(String),
    Uuid(Uuid),
    Timestamp(DateTime<Utc>),
    Json(Value),
}

impl PgBindValue {
    /// Give an untyped null the wire type of the column it is bound to.
    pub fn typed_for(self, ty: ColumnType) -> Self {
        match self {
            PgBindValue::Null => PgBindValue::TypedNull(ty),
            v => v,
        }
    }
}

fn column_type_info(ty: ColumnType) -> PgTypeInfo {
    match ty {
        ColumnType::Uuid => <Uuid as Type<Postgres>>::type_info(),
        ColumnType::Varchar(_) | ColumnType::Text => <String as Type<Postgres>>::type_info(),
        ColumnType::Integer => <i32 as Type<Postgres>>::type_info(),
        ColumnType::Boolean => <bool as Type<Postgres>>::type_info(),
        ColumnType::Timestamptz => <DateTime<Utc> as Type<Postgres>>::type_info(),
        ColumnType::Jsonb => <Value as Type<Postgres>>::type_info(),
    }
}

impl<'q> Encode<'q, Postgres> for PgBindValue {
    fn encode_by_ref(
        &self,
        buf: &mut <Postgres as Database>::ArgumentBuffer<'q>,
    ) -> Result<IsNull, BoxDynError> {
        match self {
            PgBindValue::Null | PgBindValue::TypedNull(_) => Ok(IsNull::Yes),
            PgBindValue::Bool(b) => <bool as Encode<Postgres>>::encode_by_ref(b, buf),
            PgBindValue::I32(n) => <i32 as Encode<Postgres>>::encode_by_ref(n, buf),
            PgBindValue::I64(n) => <i64 as Encode<Postgres>>::encode_by_ref(n, buf),
            PgBindValue::F64(n) => <f64 as Encode<Postgres>>::encode_by_ref(n, buf),
            PgBindValue::String(s) => <String as Encode<Postgres>>::encode_by_ref(s, buf),
            PgBindValue::Uuid(u) => <Uuid as Encode<Postgres>>::encode_by_ref(u, buf),
            PgBindValue::Timestamp(t) => <DateTime<Utc> as Encode<Postgres>>::encode_by_ref(t, buf),
            PgBindValue::Json(v) => <Value as Encode<Postgres>>::encode_by_ref(v, buf),
        }
    }

    fn produces(&self) -> Option<PgTypeInfo> {
        Some(match self {
            PgBindValue::Null | PgBindValue::String(_) => <String as Type<Postgres>>::type_info(),
            PgBindValue::TypedNull(ty) => column_type_info(*ty),
            PgBindValue::Bool(_) => <bool as Type<Postgres>>::type_info(),
            PgBindValue::I32(_) => <i32 as Type<Postgres>>::type_info(),
            PgBindValue::I64(_) => <i64 as Type<Postgres>>::type_info(),
            PgBindValue::F64(_) => <f64 as Type<Postgres>>::type_info(),
            PgBindValue::Uuid(_) => <Uuid as Type<Postgres>>::type_info(),
            PgBindValue::Timestamp(_) => <DateTime<Utc> as Type<Postgres>>::type_info(),
            PgBindValue::Json(_) => <Value as Type<Postgres>>::type_info(),
        })
    }
}

impl Type<Postgres> for PgBindValue {
    fn type_info() -> PgTypeInfo {
        PgTypeInfo::with_name("TEXT")
    }
}

impl From<bool> for PgBindValue {
    fn from(v: bool) -> Self {
        PgBindValue::Bool(v)
    }
}

impl From<i32> for PgBindValue {
    fn from(v: i32) -> Self {
        PgBindValue::I32(v)
    }
}

impl From<i64> for PgBindValue {
    fn from(v: i64) -> Self {
        PgBindValue::I64(v)
    }
}

impl From<f64> for PgBindValue {
    fn from(v: f64) -> Self {
        PgBindValue::F64(v)
    }
}

impl From<String> for PgBindValue {
    fn from(v: String) -> Self {
        PgBindValue::String(v)
    }
}

impl From<&str> for PgBindValue {
    fn from(v: &str) -> Self {
        PgBindValue::String(v.to_string())
    }
}

impl From<Uuid> for PgBindValue {
    fn from(v: Uuid) -> Self {
        PgBindValue::Uuid(v)
    }
}

impl From<DateTime<Utc>> for PgBindValue {
    fn from(v: DateTime<Utc>) -> Self {
        PgBindValue::Timestamp(v)
    }
}

impl From<Value> for PgBindValue {
    fn from(v: Value) -> Self {
        PgBindValue::Json(v)
    }
}

impl<T: Into<PgBindValue>> From<Option<T>> for PgBindValue {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(PgBindValue::Null)
    }
}
