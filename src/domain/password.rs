//! Salted and hashed user passwords.

use std::fmt;

use bcrypt::{BcryptError, non_truncating_hash, non_truncating_verify};
use serde::{Deserialize, Serialize};

/// A bcrypt hash of a user's password.
///
/// The raw password is never stored. [PasswordHash::verify] answers whether a
/// raw password is the one the hash was created from. Passwords longer than
/// 72 bytes are rejected rather than truncated.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// The recommended bcrypt cost.
    pub const DEFAULT_COST: u32 = bcrypt::DEFAULT_COST;

    /// The cheapest cost bcrypt accepts. Only suitable for tests.
    pub const MIN_COST: u32 = 4;

    /// Hash `raw_password` with the given bcrypt `cost`.
    pub fn from_raw_password(raw_password: &str, cost: u32) -> Result<Self, BcryptError> {
        non_truncating_hash(raw_password, cost).map(Self)
    }

    /// Wrap an existing hash string, e.g. one loaded from the database.
    ///
    /// The caller should ensure that `raw_hash` is a valid bcrypt hash.
    pub fn new_unchecked(raw_hash: impl Into<String>) -> Self {
        Self(raw_hash.into())
    }

    /// Check that `raw_password` matches the stored password.
    pub fn verify(&self, raw_password: &str) -> Result<bool, BcryptError> {
        non_truncating_verify(raw_password, &self.0)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(********)")
    }
}
