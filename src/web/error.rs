//! JSON API errors with HTTP status mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::core::Bilingual;
use crate::escalation::report::connection_failed;
use crate::escalation::EscalationError;

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
    /// Text to show the user, when there is one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_message: Option<Bilingual>,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Invalid request: {0}")]
    BadRequest(String),
    #[error(transparent)]
    Escalation(#[from] EscalationError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, user_message) = match &self {
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", None),
            ApiError::Escalation(_) => (StatusCode::BAD_GATEWAY, "ESCALATION_FAILED", Some(connection_failed())),
        };
        let body = ErrorBody {
            error: ErrorDetail {
                code,
                message: self.to_string(),
            },
            user_message,
        };
        (status, Json(body)).into_response()
    }
}
