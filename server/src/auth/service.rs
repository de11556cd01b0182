use std::sync::Arc;

use chrono::Duration;
use validator::Validate;

use super::jwt::TokenIssuer;
use super::password::{PasswordHasher, MAX_PASSWORD_BYTES};
use crate::error::AppError;
use crate::models::{LoginRequest, RegisterRequest, UserSummary};
use crate::store::CredentialStore;

/// Lifetime of every token minted by `login`.
pub const TOKEN_TTL_SECS: i64 = 60 * 60;

const REGISTER_FIELDS_REQUIRED: &str = "username, fullname, and password are required";
const LOGIN_FIELDS_REQUIRED: &str = "Username and password are required";

/// Registration, login and token-to-identity resolution
pub struct AuthService {
    store: Arc<dyn CredentialStore>,
    hasher: PasswordHasher,
    tokens: TokenIssuer,
}

impl AuthService {
    pub fn new(store: Arc<dyn CredentialStore>, hasher: PasswordHasher, tokens: TokenIssuer) -> Self {
        Self {
            store,
            hasher,
            tokens,
        }
    }

    /// Create an account. Input is validated before the store is touched.
    pub async fn register(&self, request: RegisterRequest) -> Result<UserSummary, AppError> {
        if [&request.username, &request.fullname, &request.password]
            .into_iter()
            .any(is_blank)
        {
            return Err(AppError::Validation(REGISTER_FIELDS_REQUIRED.to_string()));
        }
        request
            .validate()
            .map_err(|e| AppError::Validation(format!("Validation error: {e}")))?;
        let (Some(username), Some(fullname), Some(password)) =
            (request.username, request.fullname, request.password)
        else {
            return Err(AppError::Validation(REGISTER_FIELDS_REQUIRED.to_string()));
        };
        if password.len() > MAX_PASSWORD_BYTES {
            return Err(AppError::Validation(format!(
                "password must be at most {MAX_PASSWORD_BYTES} bytes"
            )));
        }

        let hasher = self.hasher.clone();
        let password_hash = tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| AppError::Internal(e.into()))??;

        let user = self
            .store
            .create(&username, &fullname, &password_hash)
            .await?;

        tracing::info!(user_id = user.id, username = %user.username, "user registered");
        Ok(user.into())
    }

    /// Exchange credentials for a bearer token.
    ///
    /// Unknown usernames and wrong passwords fail identically.
    pub async fn login(&self, request: LoginRequest) -> Result<String, AppError> {
        let (Some(username), Some(password)) = (request.username, request.password) else {
            return Err(AppError::Validation(LOGIN_FIELDS_REQUIRED.to_string()));
        };
        if username.is_empty() || password.is_empty() {
            return Err(AppError::Validation(LOGIN_FIELDS_REQUIRED.to_string()));
        }

        let user = self.store.find_by_username(&username).await?;

        let hasher = self.hasher.clone();
        let stored_hash = user.as_ref().map(|u| u.password_hash.clone());
        let verified = tokio::task::spawn_blocking(move || match stored_hash {
            Some(hash) => hasher.verify(&password, &hash),
            None => hasher.verify_decoy(&password),
        })
        .await
        .map_err(|e| AppError::Internal(e.into()))?;

        let user = match user {
            Some(user) if verified => user,
            _ => {
                tracing::warn!("login rejected");
                return Err(AppError::InvalidCredentials);
            }
        };

        let token = self
            .tokens
            .issue(user.id, &user.username, Duration::seconds(TOKEN_TTL_SECS))?;

        tracing::info!(user_id = user.id, "login succeeded");
        Ok(token)
    }

    /// Verify a token and load the user it names.
    pub async fn resolve_identity(&self, token: &str) -> Result<UserSummary, AppError> {
        let claims = self.tokens.verify(token)?;
        let user_id = claims.subject_id()?;

        self.store
            .find_by_id(user_id)
            .await?
            .map(UserSummary::from)
            .ok_or(AppError::UserNotFound)
    }
}

fn is_blank(field: &Option<String>) -> bool {
    field.as_deref().map_or(true, str::is_empty)
}
