use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::warn;

use crate::services::signup_service::SignupError;

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Error body read by the frontend (`result.detail`).
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub detail: String,
}

impl IntoResponse for SignupError {
    fn into_response(self) -> Response {
        let status = match self {
            SignupError::ActivityNotFound => StatusCode::NOT_FOUND,
            SignupError::BlankEmail
            | SignupError::AlreadySignedUp
            | SignupError::ActivityFull
            | SignupError::NotSignedUp => StatusCode::BAD_REQUEST,
        };
        warn!("Signup request rejected: {}", self);
        (
            status,
            Json(ErrorResponse {
                detail: self.to_string(),
            }),
        )
            .into_response()
    }
}
