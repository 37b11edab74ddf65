//! Entity services: stateless query modules, each operation taking an explicit pool.

mod categories;
pub(crate) mod crud;
mod media;
mod messages;
mod posts;
mod profiles;
mod settings;
mod tags;
mod validation;

pub use categories::CategoriesService;
pub use media::MediaService;
pub use messages::MessagesService;
pub use posts::PostsService;
pub use profiles::ProfilesService;
pub use settings::SettingsService;
pub use tags::TagsService;
pub use validation::RequestValidator;

/// Pool for database-backed tests, from `TEST_DATABASE_URL`. `None` skips the test.
///
/// One connection per pool: every statement a test runs goes through the same statement
/// cache, so a statement first prepared with null parameters is reused with real values.
#[cfg(test)]
pub(crate) async fn test_pool() -> Option<sqlx::PgPool> {
    static SCHEMA: tokio::sync::OnceCell<()> = tokio::sync::OnceCell::const_new();
    let url = std::env::var("TEST_DATABASE_URL").ok()?;
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(1)
        .connect(&url)
        .await
        .expect("connect TEST_DATABASE_URL");
    SCHEMA
        .get_or_try_init(|| crate::schema::apply_schema(&pool))
        .await
        .expect("apply schema");
    Some(pool)
}
