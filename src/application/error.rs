use thiserror::Error;

use crate::domain::{BalanceOverflow, EntryId};

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Authentication(#[from] AuthenticationError),

    #[error(transparent)]
    BusinessRule(#[from] BusinessRuleError),

    /// Structural misuse by the caller, distinct from a rejected request.
    #[error("invalid entry id: {0}")]
    InvalidEntryId(EntryId),

    #[error(transparent)]
    Balance(#[from] BalanceOverflow),

    #[error("Password hashing failed: {0}")]
    PasswordHash(#[from] bcrypt::BcryptError),

    #[error("Database error: {0}")]
    Database(#[from] anyhow::Error),
}

/// Why a login attempt was refused.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthenticationError {
    #[error("user not found")]
    UserNotFound,

    #[error("invalid password")]
    InvalidPassword,
}

/// A request that breaks a ledger rule. The message is meant for the end user.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusinessRuleError {
    #[error("email already registered")]
    EmailAlreadyRegistered,

    #[error("invalid description")]
    InvalidDescription,

    #[error("invalid month")]
    InvalidMonth,

    #[error("invalid year")]
    InvalidYear,

    #[error("invalid user")]
    InvalidUser,

    #[error("invalid value")]
    InvalidValue,

    #[error("invalid entry type")]
    InvalidEntryType,

    #[error("entry has not been saved")]
    UnsavedEntry,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_pass_through() {
        assert_eq!(
            AppError::from(AuthenticationError::UserNotFound).to_string(),
            "user not found"
        );
        assert_eq!(
            AppError::from(BusinessRuleError::EmailAlreadyRegistered).to_string(),
            "email already registered"
        );
        assert_eq!(AppError::InvalidEntryId(0).to_string(), "invalid entry id: 0");
    }
}
