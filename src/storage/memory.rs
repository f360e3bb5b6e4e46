use std::sync::{Arc, Mutex, MutexGuard};

use anyhow::{Result, anyhow};

use crate::domain::{
    Cents, Entry, EntryFilter, EntryId, EntryStatus, EntryType, User, UserId, sum_values,
};

use super::{EntryStore, UserStore};

#[derive(Debug, Default)]
struct State {
    users: Vec<User>,
    entries: Vec<Entry>,
    last_user_id: UserId,
    last_entry_id: EntryId,
}

/// In-process store for users and entries.
///
/// Clones share the same underlying data. IDs are assigned sequentially
/// starting at 1, so insertion order and ID order coincide.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<State>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, State>> {
        self.state
            .lock()
            .map_err(|_| anyhow!("Memory store lock poisoned"))
    }
}

impl UserStore for MemoryStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let state = self.lock()?;
        Ok(state.users.iter().find(|u| u.email == email).cloned())
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool> {
        let state = self.lock()?;
        Ok(state.users.iter().any(|u| u.email == email))
    }

    async fn save(&self, user: &User) -> Result<User> {
        let mut state = self.lock()?;
        if state.users.iter().any(|u| u.email == user.email) {
            anyhow::bail!("UNIQUE constraint failed: users.email");
        }

        state.last_user_id += 1;
        let saved = user.clone().with_id(state.last_user_id);
        state.users.push(saved.clone());
        Ok(saved)
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>> {
        let state = self.lock()?;
        Ok(state.users.iter().find(|u| u.id == Some(id)).cloned())
    }
}

impl EntryStore for MemoryStore {
    async fn save(&self, entry: &Entry) -> Result<Entry> {
        let mut state = self.lock()?;

        match entry.id {
            Some(id) if id != 0 => {
                let stored = state
                    .entries
                    .iter_mut()
                    .find(|e| e.id == Some(id))
                    .ok_or_else(|| anyhow!("Entry {id} does not exist"))?;
                *stored = entry.clone();
                Ok(entry.clone())
            }
            _ => {
                state.last_entry_id += 1;
                let saved = entry.clone().with_id(state.last_entry_id);
                state.entries.push(saved.clone());
                Ok(saved)
            }
        }
    }

    async fn delete(&self, entry: &Entry) -> Result<()> {
        let mut state = self.lock()?;
        state.entries.retain(|e| e.id != entry.id);
        Ok(())
    }

    async fn find_by_id(&self, id: EntryId) -> Result<Option<Entry>> {
        let state = self.lock()?;
        Ok(state.entries.iter().find(|e| e.id == Some(id)).cloned())
    }

    async fn find_all(&self, filter: &EntryFilter) -> Result<Vec<Entry>> {
        let state = self.lock()?;
        Ok(state
            .entries
            .iter()
            .filter(|e| filter.matches(e))
            .cloned()
            .collect())
    }

    async fn sum_by_user_type_status(
        &self,
        owner: UserId,
        entry_type: EntryType,
        status: EntryStatus,
    ) -> Result<Option<Cents>> {
        let state = self.lock()?;
        Ok(sum_values(&state.entries, owner, entry_type, status)?)
    }
}
