use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use practice_cms_core::{CmsError, ErrorKind};
use serde_json::json;

/// API error type rendered as `{"error": message, "type": kind, "statusCode": n}`.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("unauthorized")]
    Unauthorized,

    #[error("forbidden: {0}")]
    Forbidden(String),

    #[error("internal error: {0}")]
    Internal(String),

    #[error(transparent)]
    Cms(#[from] CmsError),
}

impl ApiError {
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "notFound", msg.clone()),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "badRequest", msg.clone()),
            ApiError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "unauthorized",
                "Authentication required".to_string(),
            ),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, "forbidden", msg.clone()),
            ApiError::Internal(msg) => {
                tracing::error!("Internal error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internalError",
                    "An internal error occurred".to_string(),
                )
            }
            ApiError::Cms(err) => match err.kind() {
                ErrorKind::Validation | ErrorKind::Conflict | ErrorKind::State => {
                    (StatusCode::BAD_REQUEST, err.kind().as_str(), err.to_string())
                }
                ErrorKind::NotFound => (StatusCode::NOT_FOUND, "notFound", err.to_string()),
                ErrorKind::Upstream => {
                    tracing::error!("Store error: {err}");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "internalError",
                        "An internal error occurred".to_string(),
                    )
                }
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = self.parts();

        let body = json!({
            "error": message,
            "type": error_type,
            "statusCode": status.as_u16(),
        });

        (status, Json(body)).into_response()
    }
}

/// Convenience type alias for route handlers.
pub type ApiResult<T> = Result<T, ApiError>;
