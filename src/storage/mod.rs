mod memory;
mod repository;

use anyhow::Result;

pub use memory::*;
pub use repository::*;

use crate::domain::{Cents, Entry, EntryFilter, EntryId, EntryStatus, EntryType, User, UserId};

/// SQL migration for initial schema
pub const MIGRATION_001_INITIAL: &str = include_str!("migrations/001_initial.sql");

/// Persistence for users.
pub trait UserStore: Send + Sync {
    /// Get a user by email.
    fn find_by_email(&self, email: &str) -> impl Future<Output = Result<Option<User>>> + Send;

    /// Returns true if a user with this email is already stored.
    fn exists_by_email(&self, email: &str) -> impl Future<Output = Result<bool>> + Send;

    /// Insert a user and return it with its assigned ID.
    fn save(&self, user: &User) -> impl Future<Output = Result<User>> + Send;

    /// Get a user by ID.
    fn find_by_id(&self, id: UserId) -> impl Future<Output = Result<Option<User>>> + Send;
}

/// Persistence for ledger entries.
pub trait EntryStore: Send + Sync {
    /// Insert the entry if it has no ID yet, otherwise overwrite the stored row.
    /// Returns the entry as stored.
    fn save(&self, entry: &Entry) -> impl Future<Output = Result<Entry>> + Send;

    /// Remove the entry with the same ID.
    fn delete(&self, entry: &Entry) -> impl Future<Output = Result<()>> + Send;

    /// Get an entry by ID.
    fn find_by_id(&self, id: EntryId) -> impl Future<Output = Result<Option<Entry>>> + Send;

    /// List entries matching the filter, in insertion order.
    fn find_all(&self, filter: &EntryFilter) -> impl Future<Output = Result<Vec<Entry>>> + Send;

    /// Sum the values of a user's entries with the given type and status.
    /// `None` when nothing matches.
    fn sum_by_user_type_status(
        &self,
        owner: UserId,
        entry_type: EntryType,
        status: EntryStatus,
    ) -> impl Future<Output = Result<Option<Cents>>> + Send;
}
