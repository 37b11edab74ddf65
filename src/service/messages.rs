//! Contact messages: listing by read state, create, mark as read, delete, unread count.

use super::crud::{execute, fetch_page, query_count, query_one, query_optional};
use crate::error::AppError;
use crate::models::{FindMessagesOptions, Message, NewMessage, Page};
use crate::schema::MESSAGES;
use crate::sql::{count, delete, insert, select_one, update, Assignment, Filter, OrderBy, PgBindValue};
use sqlx::PgPool;
use uuid::Uuid;

pub struct MessagesService;

impl MessagesService {
    pub async fn find_all(pool: &PgPool, options: &FindMessagesOptions) -> Result<Page<Message>, AppError> {
        let filter = Filter::new().eq_opt("is_read", options.is_read);
        fetch_page(pool, &MESSAGES, &filter, &[OrderBy::Desc("created_at")], options.window).await
    }

    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Message>, AppError> {
        query_optional(pool, select_one(&MESSAGES, "id", id)).await
    }

    /// New messages always start unread.
    pub async fn create(pool: &PgPool, data: NewMessage) -> Result<Message, AppError> {
        let q = insert(
            &MESSAGES,
            vec![
                ("id", Uuid::new_v4().into()),
                ("name", data.name.into()),
                ("email", data.email.into()),
                ("subject", data.subject.into()),
                ("content", data.content.into()),
                ("is_read", false.into()),
                ("ip_address", data.ip_address.into()),
                ("user_agent", data.user_agent.into()),
                ("locale", data.locale.into()),
            ],
        );
        let message: Message = query_one(pool, q).await?;
        tracing::info!(message_id = %message.id, "message received");
        Ok(message)
    }

    /// Sets `is_read`; `read_at` keeps the first read time on repeat calls.
    pub async fn mark_as_read(pool: &PgPool, id: Uuid) -> Result<Option<Message>, AppError> {
        let assignments = [
            Assignment::Set("is_read", true.into()),
            Assignment::FillNull {
                column: "read_at",
                fill: chrono::Utc::now().into(),
                otherwise: PgBindValue::Null,
            },
        ];
        query_optional(pool, update(&MESSAGES, id, &assignments)).await
    }

    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, AppError> {
        let affected = execute(pool, delete(&MESSAGES, id)).await?;
        Ok(affected > 0)
    }

    pub async fn unread_count(pool: &PgPool) -> Result<i64, AppError> {
        query_count(pool, count(&MESSAGES, &Filter::new().eq("is_read", false))).await
    }
}
