//! Router assembly.

mod api;
mod common;

pub use api::api_routes;
pub use common::common_routes;

use crate::response::fallback;
use crate::state::AppState;
use axum::Router;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

/// The full application: common routes, `/api` resources, an envelope 404 for anything else.
pub fn app(state: AppState, body_limit_bytes: usize) -> Router {
    Router::new()
        .merge(common_routes())
        .nest("/api", api_routes())
        .fallback(fallback)
        .layer(RequestBodyLimitLayer::new(body_limit_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{tests::token_for, JwtIdentityProvider, TOKEN_AUDIENCE};
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use serde_json::{json, Value};
    use sqlx::postgres::PgPoolOptions;
    use std::sync::Arc;
    use tower::ServiceExt;
    use uuid::Uuid;

    const SECRET: &str = "router-secret";

    /// Pool that never connects unless a handler reaches the database.
    fn lazy_state() -> AppState {
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://inkwell@localhost:1/inkwell_unreachable")
            .unwrap();
        AppState {
            pool,
            identity: Some(Arc::new(JwtIdentityProvider::new(SECRET))),
        }
    }

    async fn send(app: Router, req: Request<Body>) -> (StatusCode, Value) {
        let resp = app.oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    fn get(uri: &str) -> Request<Body> {
        Request::get(uri).body(Body::empty()).unwrap()
    }

    fn json_req(method: &str, uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn health_is_plain_ok() {
        let (status, body) = send(app(lazy_state(), 1024), get("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"status": "ok"}));
    }

    #[tokio::test]
    async fn unknown_route_is_enveloped_404() {
        let (status, body) = send(app(lazy_state(), 1024), get("/api/nothing-here")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"code": 404, "msg": "resource not found"}));
    }

    #[tokio::test]
    async fn malformed_ids_are_404_before_the_database() {
        for uri in ["/api/posts/not-a-uuid", "/api/messages/123", "/api/tags/x", "/api/media/%20"] {
            let (status, body) = send(app(lazy_state(), 1024), get(uri)).await;
            assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
            assert_eq!(body["code"], 404);
            assert!(body.get("data").is_none());
        }
    }

    #[tokio::test]
    async fn missing_required_fields_are_400() {
        let req = json_req("POST", "/api/messages", r#"{"name": "Ann", "content": "hi"}"#);
        let (status, body) = send(app(lazy_state(), 1024), req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"code": 400, "msg": "email is required"}));

        let req = json_req("POST", "/api/posts", r#"{"title": "Hello", "slug": "Not A Slug"}"#);
        let (status, body) = send(app(lazy_state(), 1024), req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], 400);
    }

    #[tokio::test]
    async fn malformed_json_is_400_envelope() {
        let req = json_req("POST", "/api/tags", "{\"name\": ");
        let (status, body) = send(app(lazy_state(), 1024), req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], 400);
        assert!(body["msg"].as_str().is_some_and(|m| !m.is_empty()));
    }

    #[tokio::test]
    async fn oversized_body_is_rejected() {
        let big = format!(r#"{{"name": "{}"}}"#, "x".repeat(4096));
        let req = json_req("POST", "/api/tags", &big);
        let (status, _) = send(app(lazy_state(), 1024), req).await;
        assert!(status.is_client_error());
        assert_ne!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn profile_requires_a_session() {
        let (status, body) = send(app(lazy_state(), 1024), get("/api/profile/me")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, json!({"code": 401, "msg": "please sign in first"}));
    }

    #[tokio::test]
    async fn invalid_bearer_token_is_401_even_on_public_routes() {
        let token = token_for(Uuid::new_v4(), "someone-else", TOKEN_AUDIENCE, 3600);
        let req = Request::post("/api/posts")
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"title": "t", "slug": "t"}"#))
            .unwrap();
        let (status, body) = send(app(lazy_state(), 1024), req).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["code"], 401);

        let req = Request::get("/api/profile/me")
            .header(header::AUTHORIZATION, "Basic abc")
            .body(Body::empty())
            .unwrap();
        let (status, _) = send(app(lazy_state(), 1024), req).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn message_round_trip_against_database() {
        let Some(pool) = crate::service::test_pool().await else { return };
        let state = AppState { pool, identity: None };
        let req = Request::post("/api/messages")
            .header(header::CONTENT_TYPE, "application/json")
            .header("x-forwarded-for", "203.0.113.9")
            .header(header::USER_AGENT, "router-test")
            .body(Body::from(r#"{"name": "Ann", "email": "a@x.com", "content": "hi"}"#))
            .unwrap();
        let (status, body) = send(app(state.clone(), 1 << 20), req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["code"], 200);
        assert_eq!(body["data"]["isRead"], false);
        assert_eq!(body["data"]["ipAddress"], "203.0.113.9");
        assert_eq!(body["data"]["userAgent"], "router-test");
        let id = body["data"]["id"].as_str().unwrap().to_string();

        let req = Request::put(format!("/api/messages/{id}/read")).body(Body::empty()).unwrap();
        let (status, body) = send(app(state.clone(), 1 << 20), req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["isRead"], true);

        let req = Request::delete(format!("/api/messages/{id}")).body(Body::empty()).unwrap();
        let (_, body) = send(app(state.clone(), 1 << 20), req).await;
        assert_eq!(body, json!({"code": 200, "data": null, "msg": "message deleted"}));
        let (status, _) = send(app(state, 1 << 20), get(&format!("/api/messages/{id}"))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn unknown_post_is_404_against_database() {
        let Some(pool) = crate::service::test_pool().await else { return };
        let state = AppState { pool, identity: None };
        let uri = format!("/api/posts/{}", Uuid::new_v4());
        let (status, body) = send(app(state, 1 << 20), get(&uri)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"code": 404, "msg": "post not found"}));
    }

    fn published_at(body: &Value) -> Option<chrono::DateTime<chrono::Utc>> {
        body["data"]["publishedAt"].as_str().map(|s| s.parse().unwrap())
    }

    #[tokio::test]
    async fn publishing_through_update_stamps_once() {
        let Some(pool) = crate::service::test_pool().await else { return };
        let state = AppState { pool, identity: None };
        let send_json = |method: &str, uri: String, body: Value| {
            let app = app(state.clone(), 1 << 20);
            let req = json_req(method, &uri, &body.to_string());
            async move { send(app, req).await }
        };

        let slug = format!("put-publish-{}", Uuid::new_v4().simple());
        let (status, body) = send_json("POST", "/api/posts".into(), json!({"title": "Draft", "slug": slug})).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["status"], "draft");
        assert!(published_at(&body).is_none());
        let uri = format!("/api/posts/{}", body["data"]["id"].as_str().unwrap());

        let (status, body) = send_json("PUT", uri.clone(), json!({"status": "published"})).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["status"], "published");
        let stamped = published_at(&body).expect("publishedAt set on first publish");

        let (_, body) = send_json("PUT", uri.clone(), json!({"status": "published"})).await;
        assert_eq!(published_at(&body), Some(stamped));

        let (_, body) = send_json("PUT", uri.clone(), json!({"title": "Renamed"})).await;
        assert_eq!(body["data"]["title"], "Renamed");
        assert_eq!(published_at(&body), Some(stamped));

        let explicit: chrono::DateTime<chrono::Utc> = "2020-01-02T03:04:05Z".parse().unwrap();
        let (_, body) = send_json(
            "PUT",
            uri.clone(),
            json!({"status": "published", "publishedAt": "2020-01-02T03:04:05Z"}),
        )
        .await;
        assert_eq!(published_at(&body), Some(explicit));

        let (status, _) = send_json("DELETE", uri.clone(), json!({})).await;
        assert_eq!(status, StatusCode::OK);
        let (status, body) = send_json("PUT", uri, json!({"status": "published"})).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["msg"], "post not found");
    }

    #[tokio::test]
    async fn signed_in_author_is_recorded() {
        let Some(pool) = crate::service::test_pool().await else { return };
        let state = AppState {
            pool,
            identity: Some(Arc::new(JwtIdentityProvider::new(SECRET))),
        };
        let user = Uuid::new_v4();
        let slug = format!("authored-{}", Uuid::new_v4().simple());
        let req = Request::post("/api/posts")
            .header(header::AUTHORIZATION, format!("Bearer {}", token_for(user, SECRET, TOKEN_AUDIENCE, 600)))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json!({"title": "Mine", "slug": slug, "status": "published"}).to_string()))
            .unwrap();
        let (status, body) = send(app(state, 1 << 20), req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["authorId"], user.to_string());
        assert!(body["data"]["publishedAt"].is_string());
    }
}
