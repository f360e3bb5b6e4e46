use crate::domain::PasswordHash;

/// Tunables shared by the application services.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceConfig {
    /// bcrypt cost used when hashing new passwords.
    pub password_cost: u32,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            password_cost: PasswordHash::DEFAULT_COST,
        }
    }
}

impl ServiceConfig {
    pub fn with_password_cost(mut self, cost: u32) -> Self {
        self.password_cost = cost;
        self
    }
}
