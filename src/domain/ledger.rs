use thiserror::Error;

use super::{Cents, Entry, EntryStatus, EntryType, UserId};

/// A sum or balance that does not fit in [Cents].
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("balance overflow")]
pub struct BalanceOverflow;

/// Sum the values of a user's entries with the given type and status.
/// Returns `None` when no entry matches, mirroring SQL `SUM` over zero rows.
pub fn sum_values(
    entries: &[Entry],
    owner: UserId,
    entry_type: EntryType,
    status: EntryStatus,
) -> Result<Option<Cents>, BalanceOverflow> {
    entries
        .iter()
        .filter(|e| {
            e.owner == Some(owner) && e.entry_type == Some(entry_type) && e.status == Some(status)
        })
        .map(|e| e.value.unwrap_or(0))
        .try_fold(None, |total: Option<Cents>, value| match total {
            None => Ok(Some(value)),
            Some(total) => total.checked_add(value).map(Some).ok_or(BalanceOverflow),
        })
}

/// Net balance from the settled sums: income minus expense.
/// Missing sums count as zero.
pub fn net_balance(
    settled_income: Option<Cents>,
    settled_expense: Option<Cents>,
) -> Result<Cents, BalanceOverflow> {
    settled_income
        .unwrap_or(0)
        .checked_sub(settled_expense.unwrap_or(0))
        .ok_or(BalanceOverflow)
}
