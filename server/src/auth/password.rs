//! bcrypt password hashing

use thiserror::Error;

/// bcrypt only reads the first 72 bytes of its input.
pub const MAX_PASSWORD_BYTES: usize = 72;

const DECOY_PASSWORD: &str = "tripnote-decoy-password";

#[derive(Debug, Error)]
#[error("password hashing failed: {0}")]
pub struct PasswordError(#[from] bcrypt::BcryptError);

/// Salted, adaptive one-way hashing
#[derive(Clone)]
pub struct PasswordHasher {
    cost: u32,
    decoy_hash: String,
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Result<Self, PasswordError> {
        let decoy_hash = bcrypt::hash(DECOY_PASSWORD, cost)?;
        Ok(Self { cost, decoy_hash })
    }

    /// Hash with a fresh random salt; the salt and cost are embedded in the output.
    pub fn hash(&self, plaintext: &str) -> Result<String, PasswordError> {
        Ok(bcrypt::hash(plaintext, self.cost)?)
    }

    /// Check `plaintext` against a stored hash. Malformed hashes verify as `false`.
    ///
    /// Input longer than [`MAX_PASSWORD_BYTES`] never matches, even when its
    /// first 72 bytes do. The hash is still computed so the cost is unchanged.
    pub fn verify(&self, plaintext: &str, hash: &str) -> bool {
        let matched = bcrypt::verify(plaintext, hash).unwrap_or(false);
        matched && plaintext.len() <= MAX_PASSWORD_BYTES
    }

    /// Burn the same work as a real verification, for unknown usernames.
    /// The outcome is discarded; the answer is always `false`.
    pub fn verify_decoy(&self, plaintext: &str) -> bool {
        std::hint::black_box(self.verify(plaintext, &self.decoy_hash));
        false
    }
}

impl std::fmt::Debug for PasswordHasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordHasher")
            .field("cost", &self.cost)
            .finish_non_exhaustive()
    }
}
