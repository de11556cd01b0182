//! API handlers for the tripnote server

use axum::extract::rejection::JsonRejection;
use axum::Json;

use crate::error::AppError;

pub mod auth;
pub mod review;

pub use auth::{login, profile, register};
pub use review::{create_review, list_reviews};

pub async fn root() -> &'static str {
    "Tripnote API Server"
}

pub async fn health_check() -> &'static str {
    "OK"
}

/// Unwrap a JSON body, reporting unreadable payloads as a 400.
pub(crate) fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    match payload {
        Ok(Json(body)) => Ok(body),
        Err(rejection) => {
            tracing::debug!(error = %rejection, "rejected request body");
            Err(AppError::Validation("Request body must be valid JSON".to_string()))
        }
    }
}
