use chrono::Utc;

use crate::domain::{
    Cents, Entry, EntryFilter, EntryId, EntryStatus, EntryType, UserId, net_balance,
};
use crate::storage::EntryStore;

use super::{AppError, BusinessRuleError};

/// Validation and bookkeeping for ledger entries on top of an [EntryStore].
pub struct EntryService<S> {
    store: S,
}

impl<S: EntryStore> EntryService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Validate and persist a new entry.
    ///
    /// The entry starts out `Pending` unless a status was given, and is
    /// stamped with today's date. Any ID on `entry` is ignored, so this always
    /// inserts a new row. Nothing is written if validation fails.
    pub async fn save(&self, entry: &Entry) -> Result<Entry, AppError> {
        self.validate(entry)?;

        let mut entry = entry.clone();
        entry.id = None;
        entry.status.get_or_insert(EntryStatus::Pending);
        entry
            .registered_at
            .get_or_insert_with(|| Utc::now().date_naive());

        let saved = self.store.save(&entry).await?;
        tracing::info!(
            "Saved entry {:?} for user {:?}: {:?} {:?}",
            saved.id,
            saved.owner,
            saved.entry_type,
            saved.value
        );
        Ok(saved)
    }

    /// Validate and overwrite an already persisted entry.
    pub async fn update(&self, entry: &Entry) -> Result<Entry, AppError> {
        if !entry.is_persisted() {
            return Err(BusinessRuleError::UnsavedEntry.into());
        }
        self.validate(entry)?;

        let updated = self.store.save(entry).await?;
        tracing::info!("Updated entry {:?}", updated.id);
        Ok(updated)
    }

    /// Set a new status and persist it through [EntryService::update].
    ///
    /// Any status may follow any other.
    pub async fn update_status(
        &self,
        entry: &mut Entry,
        status: EntryStatus,
    ) -> Result<Entry, AppError> {
        tracing::debug!(
            "Entry {:?} status {:?} -> {}",
            entry.id,
            entry.status,
            status
        );
        entry.status = Some(status);
        self.update(entry).await
    }

    /// Remove a persisted entry.
    pub async fn delete(&self, entry: &Entry) -> Result<(), AppError> {
        if !entry.is_persisted() {
            return Err(AppError::InvalidEntryId(entry.id.unwrap_or(0)));
        }

        self.store.delete(entry).await?;
        tracing::info!("Deleted entry {:?}", entry.id);
        Ok(())
    }

    /// All entries equal to `example` on each of its present fields.
    pub async fn find(&self, example: &Entry) -> Result<Vec<Entry>, AppError> {
        self.find_filtered(&EntryFilter::from(example)).await
    }

    pub async fn find_filtered(&self, filter: &EntryFilter) -> Result<Vec<Entry>, AppError> {
        Ok(self.store.find_all(filter).await?)
    }

    pub async fn find_by_id(&self, id: EntryId) -> Result<Option<Entry>, AppError> {
        Ok(self.store.find_by_id(id).await?)
    }

    /// Settled income minus settled expense for a user.
    pub async fn balance(&self, owner: UserId) -> Result<Cents, AppError> {
        let income = self
            .store
            .sum_by_user_type_status(owner, EntryType::Income, EntryStatus::Settled)
            .await?;
        let expense = self
            .store
            .sum_by_user_type_status(owner, EntryType::Expense, EntryStatus::Settled)
            .await?;

        Ok(net_balance(income, expense)?)
    }

    /// Check the entry's fields, reporting only the first problem found.
    ///
    /// Fields are checked in order: description, month, year, owner, value,
    /// entry type.
    pub fn validate(&self, entry: &Entry) -> Result<(), BusinessRuleError> {
        if entry
            .description
            .as_deref()
            .is_none_or(|d| d.trim().is_empty())
        {
            return Err(BusinessRuleError::InvalidDescription);
        }

        if !entry.month.is_some_and(|m| (1..=12).contains(&m)) {
            return Err(BusinessRuleError::InvalidMonth);
        }

        if !entry.year.is_some_and(|y| (1000..=9999).contains(&y)) {
            return Err(BusinessRuleError::InvalidYear);
        }

        if entry.owner.is_none() {
            return Err(BusinessRuleError::InvalidUser);
        }

        if !entry.value.is_some_and(|v| v > 0) {
            return Err(BusinessRuleError::InvalidValue);
        }

        if entry.entry_type.is_none() {
            return Err(BusinessRuleError::InvalidEntryType);
        }

        Ok(())
    }
}
