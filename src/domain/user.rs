use serde::{Deserialize, Serialize};

use super::PasswordHash;

pub type UserId = i64;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Assigned by the store on first save.
    pub id: Option<UserId>,
    pub name: String,
    /// Unique across all users.
    pub email: String,
    #[serde(skip_serializing)]
    pub password: PasswordHash,
}

impl User {
    pub fn new(name: impl Into<String>, email: impl Into<String>, password: PasswordHash) -> Self {
        Self {
            id: None,
            name: name.into(),
            email: email.into(),
            password,
        }
    }

    pub fn with_id(mut self, id: UserId) -> Self {
        self.id = Some(id);
        self
    }
}
