//! Resource routes under `/api`.

use crate::handlers::{categories, media, messages, posts, profile, settings, tags};
use crate::state::AppState;
use axum::{
    routing::{get, post, put},
    Router,
};

pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/posts", get(posts::list_posts).post(posts::create_post))
        .route("/posts/slug/:slug", get(posts::get_post_by_slug))
        .route(
            "/posts/:id",
            get(posts::get_post).put(posts::update_post).delete(posts::delete_post),
        )
        .route("/posts/:id/publish", post(posts::publish_post))
        .route("/messages", get(messages::list_messages).post(messages::create_message))
        .route("/messages/unread-count", get(messages::unread_count))
        .route(
            "/messages/:id",
            get(messages::get_message).delete(messages::delete_message),
        )
        .route("/messages/:id/read", put(messages::mark_message_read))
        .route(
            "/categories",
            get(categories::list_categories).post(categories::create_category),
        )
        .route("/categories/slug/:slug", get(categories::get_category_by_slug))
        .route(
            "/categories/:id",
            get(categories::get_category)
                .put(categories::update_category)
                .delete(categories::delete_category),
        )
        .route("/tags", get(tags::list_tags).post(tags::create_tag))
        .route("/tags/slug/:slug", get(tags::get_tag_by_slug))
        .route(
            "/tags/:id",
            get(tags::get_tag).put(tags::update_tag).delete(tags::delete_tag),
        )
        .route("/media", get(media::list_media).post(media::create_media))
        .route(
            "/media/:id",
            get(media::get_media).put(media::update_media).delete(media::delete_media),
        )
        .route("/settings", get(settings::list_settings))
        .route(
            "/settings/:key",
            get(settings::get_setting)
                .put(settings::put_setting)
                .delete(settings::delete_setting),
        )
        .route(
            "/profile/me",
            get(profile::get_my_profile).put(profile::update_my_profile),
        )
}
