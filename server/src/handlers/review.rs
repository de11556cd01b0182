use std::sync::Arc;

use axum::{extract::rejection::JsonRejection, extract::State, http::StatusCode, Json};

use super::json_body;
use crate::error::AppError;
use crate::middleware::AuthenticatedUser;
use crate::models::{CreateReviewRequest, CreateReviewResponse, ReviewListResponse};
use crate::services::ReviewService;

/// `GET /reviews`
pub async fn list_reviews(
    State(review_service): State<Arc<ReviewService>>,
) -> Result<Json<ReviewListResponse>, AppError> {
    let reviews = review_service.list_reviews().await?;
    Ok(Json(ReviewListResponse { reviews }))
}

/// `POST /reviews` (behind the access gate)
pub async fn create_review(
    State(review_service): State<Arc<ReviewService>>,
    AuthenticatedUser(author): AuthenticatedUser,
    payload: Result<Json<CreateReviewRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CreateReviewResponse>), AppError> {
    let request = json_body(payload)?;
    let review = review_service.create_review(&author, request).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateReviewResponse {
            message: "Review created".to_string(),
            review,
        }),
    ))
}
