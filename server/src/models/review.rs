//! Travel review records and DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Review {
    pub id: i64,
    pub username: String,
    pub rating: i64,
    pub review: String,
    pub created_at: DateTime<Utc>,
}

/// Body for `POST /reviews`. The author comes from the bearer token.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct CreateReviewRequest {
    #[validate(required, range(min = 1, max = 5))]
    pub rating: Option<i64>,
    #[validate(required, length(min = 1, max = 2000))]
    pub review: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateReviewResponse {
    pub message: String,
    pub review: Review,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReviewListResponse {
    pub reviews: Vec<Review>,
}
