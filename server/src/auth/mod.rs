//! Authentication module for tripnote
//!
//! - bcrypt password hashing with constant-time verification
//! - HS256 JWT issuing and validation
//! - Registration, login and identity resolution over a credential store

mod jwt;
mod password;
mod service;

pub use jwt::{Claims, TokenError, TokenIssuer};
pub use password::{PasswordError, PasswordHasher, MAX_PASSWORD_BYTES};
pub use service::{AuthService, TOKEN_TTL_SECS};
