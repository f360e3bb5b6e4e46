// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::Result;
use finbook::application::{LedgerService, ServiceConfig};
use finbook::domain::{
    Cents, Entry, EntryFilter, EntryId, EntryStatus, EntryType, PasswordHash, User, UserId,
};
use finbook::storage::{EntryStore, MemoryStore, Repository, UserStore};
use tempfile::TempDir;

/// Cheap hashing so tests don't spend their time in bcrypt
pub fn test_config() -> ServiceConfig {
    ServiceConfig::default().with_password_cost(PasswordHash::MIN_COST)
}

/// Helper to create a test service with a temporary database
pub async fn test_service() -> Result<(LedgerService<Repository>, TempDir)> {
    let temp_dir = TempDir::new()?;
    let db_path = temp_dir.path().join("test.db");
    let service = LedgerService::init(db_path.to_str().unwrap(), test_config()).await?;
    Ok((service, temp_dir))
}

/// Helper to create a test repository with a temporary database
pub async fn test_repository() -> Result<(Repository, TempDir)> {
    let temp_dir = TempDir::new()?;
    let db_path = temp_dir.path().join("test.db");
    let repo = Repository::init(&format!("sqlite:{}?mode=rwc", db_path.display())).await?;
    Ok((repo, temp_dir))
}

pub fn memory_service() -> LedgerService<MemoryStore> {
    LedgerService::new(MemoryStore::new(), test_config())
}

/// A complete, unsaved entry owned by `owner`.
pub fn sample_entry(owner: UserId) -> Entry {
    Entry::new("Salario", 1, 2020, 100, EntryType::Income, owner)
}

pub fn sample_user(email: &str, password: &str) -> User {
    User::new(
        "usuario",
        email,
        PasswordHash::from_raw_password(password, PasswordHash::MIN_COST).unwrap(),
    )
}

/// Save a settled entry and return it.
pub async fn settled<S: UserStore + EntryStore + Clone>(
    service: &LedgerService<S>,
    owner: UserId,
    entry_type: EntryType,
    value: Cents,
) -> Result<Entry> {
    let entry = Entry::new("test", 6, 2024, value, entry_type, owner)
        .with_status(EntryStatus::Settled);
    Ok(service.entries().save(&entry).await?)
}

/// Wraps a [MemoryStore] and counts calls to the mutating store methods.
#[derive(Clone, Default)]
pub struct CountingStore {
    inner: MemoryStore,
    user_saves: Arc<AtomicUsize>,
    entry_saves: Arc<AtomicUsize>,
    entry_deletes: Arc<AtomicUsize>,
}

impl CountingStore {
    pub fn user_saves(&self) -> usize {
        self.user_saves.load(Ordering::SeqCst)
    }

    pub fn entry_saves(&self) -> usize {
        self.entry_saves.load(Ordering::SeqCst)
    }

    pub fn entry_deletes(&self) -> usize {
        self.entry_deletes.load(Ordering::SeqCst)
    }

    /// Store a user directly, bypassing the counter.
    pub async fn seed_user(&self, user: &User) -> Result<User> {
        UserStore::save(&self.inner, user).await
    }
}

impl UserStore for CountingStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        self.inner.find_by_email(email).await
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool> {
        self.inner.exists_by_email(email).await
    }

    async fn save(&self, user: &User) -> Result<User> {
        self.user_saves.fetch_add(1, Ordering::SeqCst);
        UserStore::save(&self.inner, user).await
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>> {
        UserStore::find_by_id(&self.inner, id).await
    }
}

impl EntryStore for CountingStore {
    async fn save(&self, entry: &Entry) -> Result<Entry> {
        self.entry_saves.fetch_add(1, Ordering::SeqCst);
        EntryStore::save(&self.inner, entry).await
    }

    async fn delete(&self, entry: &Entry) -> Result<()> {
        self.entry_deletes.fetch_add(1, Ordering::SeqCst);
        self.inner.delete(entry).await
    }

    async fn find_by_id(&self, id: EntryId) -> Result<Option<Entry>> {
        EntryStore::find_by_id(&self.inner, id).await
    }

    async fn find_all(&self, filter: &EntryFilter) -> Result<Vec<Entry>> {
        self.inner.find_all(filter).await
    }

    async fn sum_by_user_type_status(
        &self,
        owner: UserId,
        entry_type: EntryType,
        status: EntryStatus,
    ) -> Result<Option<Cents>> {
        self.inner
            .sum_by_user_type_status(owner, entry_type, status)
            .await
    }
}

pub fn counting_service() -> (LedgerService<CountingStore>, CountingStore) {
    let store = CountingStore::default();
    (LedgerService::new(store.clone(), test_config()), store)
}
