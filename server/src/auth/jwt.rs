//! Bearer token issuing and verification (HS256 JWT)

use std::sync::Arc;

use chrono::Duration;
use jsonwebtoken::{
    crypto, decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header,
    Validation,
};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::JwtSecret;

const ALGORITHM: Algorithm = Algorithm::HS256;

/// Claims carried by every bearer token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User id, as a decimal string.
    pub sub: String,
    pub username: String,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn subject_id(&self) -> Result<i64, TokenError> {
        self.sub.parse().map_err(|_| TokenError::Malformed)
    }
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token signature is invalid")]
    InvalidSignature,

    #[error("token has expired")]
    Expired,

    #[error("token is malformed")]
    Malformed,

    #[error("failed to sign token: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),
}

pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    clock: Arc<dyn Clock>,
}

impl TokenIssuer {
    pub fn new(secret: &JwtSecret, clock: Arc<dyn Clock>) -> Self {
        let mut validation = Validation::new(ALGORITHM);
        // Expiry is checked against `clock` in `verify`, not the system time.
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            clock,
        }
    }

    pub fn issue(&self, subject_id: i64, username: &str, ttl: Duration) -> Result<String, TokenError> {
        let issued_at = self.clock.utc().timestamp();
        let claims = Claims {
            sub: subject_id.to_string(),
            username: username.to_string(),
            iat: issued_at,
            exp: issued_at + ttl.num_seconds(),
        };

        encode(&Header::new(ALGORITHM), &claims, &self.encoding_key).map_err(TokenError::Signing)
    }

    /// Check the signature, then the expiry. Claims are only returned if both pass.
    ///
    /// The MAC is checked over the raw `header.payload` bytes before either
    /// segment is decoded, so any altered byte reports `InvalidSignature`.
    /// Only input that is not three base64url segments is `Malformed`.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let (message, signature) = split_signed(token).ok_or(TokenError::Malformed)?;
        let signed = crypto::verify(signature, message.as_bytes(), &self.decoding_key, ALGORITHM)
            .map_err(classify)?;
        if !signed {
            return Err(TokenError::InvalidSignature);
        }

        let data = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(classify)?;
        let claims = data.claims;

        if self.clock.utc().timestamp() >= claims.exp {
            return Err(TokenError::Expired);
        }

        Ok(claims)
    }
}

/// Split a compact JWS into its signed part and signature segment.
fn split_signed(token: &str) -> Option<(&str, &str)> {
    let (message, signature) = token.rsplit_once('.')?;
    let segments = message.split('.').chain(std::iter::once(signature));
    let mut count = 0;
    for segment in segments {
        if segment.is_empty() || !segment.bytes().all(is_base64url) {
            return None;
        }
        count += 1;
    }
    (count == 3).then_some((message, signature))
}

fn is_base64url(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'-' || byte == b'_'
}

fn classify(err: jsonwebtoken::errors::Error) -> TokenError {
    match err.kind() {
        ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => TokenError::InvalidSignature,
        ErrorKind::ExpiredSignature => TokenError::Expired,
        _ => TokenError::Malformed,
    }
}
