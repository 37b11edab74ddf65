//! Standard response envelope: `{code, data?, msg}`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

pub const MSG_SUCCESS: &str = "success";
pub const MSG_UNAUTHORIZED: &str = "please sign in first";
pub const MSG_FORBIDDEN: &str = "access denied";
pub const MSG_NOT_FOUND: &str = "resource not found";

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    pub msg: String,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self::success_with(data, MSG_SUCCESS)
    }

    pub fn success_with(data: T, msg: impl Into<String>) -> Self {
        ApiResponse {
            code: 200,
            data: Some(data),
            msg: msg.into(),
        }
    }

    /// Error envelope with the default code 400.
    pub fn error(msg: impl Into<String>) -> Self {
        Self::error_with_code(msg, 400)
    }

    pub fn error_with_code(msg: impl Into<String>, code: u16) -> Self {
        ApiResponse {
            code,
            data: None,
            msg: msg.into(),
        }
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::error_with_code(msg, 401)
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::error_with_code(msg, 403)
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::error_with_code(msg, 404)
    }
}

pub fn success<T>(data: T) -> ApiResponse<T> {
    ApiResponse::success(data)
}

pub fn success_with<T>(data: T, msg: impl Into<String>) -> ApiResponse<T> {
    ApiResponse::success_with(data, msg)
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}

/// Fallback for unmatched routes.
pub async fn fallback() -> ApiResponse<()> {
    ApiResponse::not_found(MSG_NOT_FOUND)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn success_carries_data_and_default_message() {
        let body = serde_json::to_value(success(json!({"id": 1}))).unwrap();
        assert_eq!(body, json!({"code": 200, "data": {"id": 1}, "msg": "success"}));
    }

    #[test]
    fn success_with_null_payload_keeps_data_key() {
        let body = serde_json::to_value(success_with((), "post deleted")).unwrap();
        assert_eq!(body, json!({"code": 200, "data": null, "msg": "post deleted"}));
    }

    #[test]
    fn error_defaults_to_400_and_omits_data() {
        let body = serde_json::to_value(ApiResponse::<()>::error("bad input")).unwrap();
        assert_eq!(body, json!({"code": 400, "msg": "bad input"}));
    }

    #[test]
    fn fixed_code_constructors() {
        assert_eq!(ApiResponse::<()>::unauthorized(MSG_UNAUTHORIZED).code, 401);
        assert_eq!(ApiResponse::<()>::forbidden(MSG_FORBIDDEN).code, 403);
        assert_eq!(ApiResponse::<()>::not_found(MSG_NOT_FOUND).code, 404);
        assert_eq!(ApiResponse::<()>::error_with_code("boom", 500).code, 500);
    }

    #[test]
    fn http_status_mirrors_envelope_code() {
        let resp = ApiResponse::<()>::forbidden(MSG_FORBIDDEN).into_response();
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
        let resp = success(1).into_response();
        assert_eq!(resp.status(), StatusCode::OK);
    }
}
