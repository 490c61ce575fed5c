//! API error responses

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};

use crate::error::SiteError;

/// Error returned by API handlers, rendered as `{"error": message}`
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m),
            ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m),
            ApiError::Internal(m) => (StatusCode::INTERNAL_SERVER_ERROR, m),
        };
        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

impl From<SiteError> for ApiError {
    fn from(err: SiteError) -> Self {
        match err {
            SiteError::NotFound(m) => ApiError::NotFound(m),
            SiteError::Validation(m) => ApiError::BadRequest(m),
            other => {
                tracing::error!("Internal error: {}", other);
                ApiError::Internal("Internal server error".to_string())
            }
        }
    }
}
