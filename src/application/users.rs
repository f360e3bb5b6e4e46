use crate::domain::{PasswordHash, User, UserId};
use crate::storage::UserStore;

use super::{AppError, AuthenticationError, BusinessRuleError, ServiceConfig};

/// Signup and login on top of a [UserStore].
pub struct UserService<S> {
    store: S,
    config: ServiceConfig,
}

impl<S: UserStore> UserService<S> {
    pub fn new(store: S, config: ServiceConfig) -> Self {
        Self { store, config }
    }

    /// Check `email` and `password` against the stored user.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<User, AppError> {
        let Some(user) = self.store.find_by_email(email).await? else {
            tracing::warn!("Login attempt for unknown email {email}");
            return Err(AuthenticationError::UserNotFound.into());
        };

        match user.password.verify(password) {
            Ok(true) => {}
            Ok(false) => {
                tracing::warn!("Login attempt with wrong password for {email}");
                return Err(AuthenticationError::InvalidPassword.into());
            }
            Err(error) => {
                tracing::warn!("Could not verify password for {email}: {error}");
                return Err(AuthenticationError::InvalidPassword.into());
            }
        }

        tracing::info!("User {:?} authenticated", user.id);
        Ok(user)
    }

    /// Fail if a user with this email already exists.
    pub async fn validate_email(&self, email: &str) -> Result<(), AppError> {
        if self.store.exists_by_email(email).await? {
            return Err(BusinessRuleError::EmailAlreadyRegistered.into());
        }
        Ok(())
    }

    /// Persist a new user. The email must not be registered yet.
    pub async fn save(&self, user: &User) -> Result<User, AppError> {
        self.validate_email(&user.email).await?;
        self.persist(user).await
    }

    /// Hash `password` and persist a new user.
    pub async fn register(
        &self,
        name: impl Into<String>,
        email: impl Into<String>,
        password: &str,
    ) -> Result<User, AppError> {
        let email = email.into();
        self.validate_email(&email).await?;

        let password = PasswordHash::from_raw_password(password, self.config.password_cost)?;
        self.persist(&User::new(name, email, password)).await
    }

    pub async fn find_by_id(&self, id: UserId) -> Result<Option<User>, AppError> {
        Ok(self.store.find_by_id(id).await?)
    }

    async fn persist(&self, user: &User) -> Result<User, AppError> {
        let saved = self.store.save(user).await?;
        tracing::info!("Registered user {:?} <{}>", saved.id, saved.email);
        Ok(saved)
    }
}
