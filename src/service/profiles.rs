//! Profiles keyed by the identity provider's subject id.

use super::crud::{execute, query_one, query_optional};
use crate::error::AppError;
use crate::models::{Profile, ProfilePatch};
use crate::schema::PROFILES;
use crate::sql::{select_one, upsert};
use sqlx::PgPool;
use uuid::Uuid;

pub struct ProfilesService;

impl ProfilesService {
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Profile>, AppError> {
        query_optional(pool, select_one(&PROFILES, "id", id)).await
    }

    /// Insert a bare profile row unless one exists. Rows referencing a user need it first.
    pub async fn ensure(pool: &PgPool, id: Uuid) -> Result<(), AppError> {
        execute(pool, upsert(&PROFILES, vec![("id", id.into())], &[])).await?;
        Ok(())
    }

    /// Create the profile on first use, otherwise apply the given fields.
    pub async fn upsert(pool: &PgPool, id: Uuid, patch: ProfilePatch) -> Result<Profile, AppError> {
        let mut values = vec![("id", id.into())];
        for (col, value) in [
            ("username", patch.username),
            ("display_name", patch.display_name),
            ("avatar_url", patch.avatar_url),
            ("bio", patch.bio),
        ] {
            if let Some(v) = value {
                values.push((col, v.into()));
            }
        }
        query_one(pool, upsert(&PROFILES, values, &["updated_at"])).await
    }
}
