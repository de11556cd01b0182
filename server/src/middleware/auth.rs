//! Access gate for protected routes
//!
//! [`require_auth`] runs before the handler: it pulls the bearer token out
//! of the `Authorization` header, resolves it to a user and stores the result
//! in the request extensions. Handlers read it back with the
//! [`AuthenticatedUser`] extractor.

use std::sync::Arc;

use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use axum_extra::{typed_header::TypedHeaderRejection, TypedHeader};
use headers::{authorization::Bearer, Authorization};

use crate::auth::AuthService;
use crate::error::AppError;
use crate::models::UserSummary;

/// Identity resolved from a valid bearer token
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub UserSummary);

pub async fn require_auth(
    State(auth_service): State<Arc<AuthService>>,
    bearer: Result<TypedHeader<Authorization<Bearer>>, TypedHeaderRejection>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    // Missing header, another scheme, or a bare "Bearer" all land here.
    let TypedHeader(Authorization(bearer)) = bearer.map_err(|_| AppError::Unauthenticated)?;
    let token = bearer.token().trim();
    if token.is_empty() {
        return Err(AppError::Unauthenticated);
    }

    let user = auth_service.resolve_identity(token).await?;
    tracing::debug!(user_id = user.id, "request authenticated");

    request.extensions_mut().insert(AuthenticatedUser(user));
    Ok(next.run(request).await)
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or(AppError::Unauthenticated)
    }
}
