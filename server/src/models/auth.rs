//! Request and response DTOs for registration, login and profile

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::UserSummary;

/// Registration body. Fields are optional so that an absent field is
/// reported as a validation error rather than a deserialisation failure.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(required, length(min = 1, max = 64))]
    pub username: Option<String>,
    #[validate(required, length(min = 1, max = 128))]
    pub fullname: Option<String>,
    #[validate(required, length(min = 1))]
    pub password: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub message: String,
    pub token: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub user: UserSummary,
}
