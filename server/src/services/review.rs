//! Review service layer

use chrono::Utc;
use sqlx::SqlitePool;
use validator::Validate;

use crate::error::AppError;
use crate::models::{CreateReviewRequest, Review, UserSummary};
use crate::store::StoreError;

/// Upper bound on rows returned by `list_reviews`.
const LIST_LIMIT: i64 = 100;

/// Travel reviews written by registered users
pub struct ReviewService {
    db_pool: SqlitePool,
}

impl ReviewService {
    pub fn new(db_pool: SqlitePool) -> Self {
        Self { db_pool }
    }

    /// Newest reviews first.
    pub async fn list_reviews(&self) -> Result<Vec<Review>, AppError> {
        let reviews = sqlx::query_as::<_, Review>(
            r#"
            SELECT id, username, rating, review, created_at
            FROM reviews
            ORDER BY id DESC
            LIMIT ?
            "#,
        )
        .bind(LIST_LIMIT)
        .fetch_all(&self.db_pool)
        .await
        .map_err(StoreError::from)?;

        Ok(reviews)
    }

    /// Store a review authored by `author`.
    pub async fn create_review(
        &self,
        author: &UserSummary,
        request: CreateReviewRequest,
    ) -> Result<Review, AppError> {
        request
            .validate()
            .map_err(|e| AppError::Validation(format!("Validation error: {e}")))?;
        let (Some(rating), Some(text)) = (request.rating, request.review) else {
            return Err(AppError::Validation(
                "rating and review are required".to_string(),
            ));
        };

        let review = sqlx::query_as::<_, Review>(
            r#"
            INSERT INTO reviews (username, rating, review, created_at)
            VALUES (?, ?, ?, ?)
            RETURNING id, username, rating, review, created_at
            "#,
        )
        .bind(&author.username)
        .bind(rating)
        .bind(&text)
        .bind(Utc::now())
        .fetch_one(&self.db_pool)
        .await
        .map_err(StoreError::from)?;

        tracing::info!(review_id = review.id, username = %review.username, "review created");
        Ok(review)
    }
}
