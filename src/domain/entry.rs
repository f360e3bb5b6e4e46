use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{Cents, UserId};

pub type EntryId = i64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    /// Money coming in (salary, refunds, ...)
    Income,
    /// Money going out (bills, groceries, ...)
    Expense,
}

impl EntryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryType::Income => "income",
            EntryType::Expense => "expense",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "income" => Some(EntryType::Income),
            "expense" => Some(EntryType::Expense),
            _ => None,
        }
    }
}

impl std::fmt::Display for EntryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Settlement status of an entry.
///
/// Any status can be set from any other; only `Settled` entries count
/// towards a balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryStatus {
    /// Recorded but not yet realized
    Pending,
    /// Realized; included in the balance
    Settled,
    /// Excluded from the balance
    Cancelled,
}

impl EntryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryStatus::Pending => "pending",
            EntryStatus::Settled => "settled",
            EntryStatus::Cancelled => "cancelled",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Some(EntryStatus::Pending),
            "settled" => Some(EntryStatus::Settled),
            "cancelled" | "canceled" => Some(EntryStatus::Cancelled),
            _ => None,
        }
    }
}

impl std::fmt::Display for EntryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single income or expense record for a competence month/year.
///
/// Every field is optional so that incomplete submissions can be represented
/// and rejected by validation instead of at construction time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// Assigned by the store on first save.
    pub id: Option<EntryId>,
    pub description: Option<String>,
    /// Competence month, 1 to 12.
    pub month: Option<u32>,
    /// Competence year, four digits.
    pub year: Option<i32>,
    /// Amount in cents (must be positive)
    pub value: Option<Cents>,
    pub entry_type: Option<EntryType>,
    pub status: Option<EntryStatus>,
    /// The user this entry belongs to
    pub owner: Option<UserId>,
    /// Date the entry was first recorded
    pub registered_at: Option<NaiveDate>,
}

impl Entry {
    /// Create a complete, unsaved entry.
    pub fn new(
        description: impl Into<String>,
        month: u32,
        year: i32,
        value: Cents,
        entry_type: EntryType,
        owner: UserId,
    ) -> Self {
        Self {
            description: Some(description.into()),
            month: Some(month),
            year: Some(year),
            value: Some(value),
            entry_type: Some(entry_type),
            owner: Some(owner),
            ..Self::default()
        }
    }

    pub fn with_id(mut self, id: EntryId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_month(mut self, month: u32) -> Self {
        self.month = Some(month);
        self
    }

    pub fn with_year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    pub fn with_value(mut self, value: Cents) -> Self {
        self.value = Some(value);
        self
    }

    pub fn with_type(mut self, entry_type: EntryType) -> Self {
        self.entry_type = Some(entry_type);
        self
    }

    pub fn with_status(mut self, status: EntryStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_owner(mut self, owner: UserId) -> Self {
        self.owner = Some(owner);
        self
    }

    /// Returns true if the entry has a store-assigned, non-zero id.
    pub fn is_persisted(&self) -> bool {
        matches!(self.id, Some(id) if id != 0)
    }
}

/// Query-by-example for entries.
///
/// Each present field becomes an equality predicate; an entry matches when
/// all predicates hold. An empty filter matches every entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryFilter {
    pub id: Option<EntryId>,
    pub description: Option<String>,
    pub month: Option<u32>,
    pub year: Option<i32>,
    pub value: Option<Cents>,
    pub entry_type: Option<EntryType>,
    pub status: Option<EntryStatus>,
    pub owner: Option<UserId>,
}

impl EntryFilter {
    pub fn matches(&self, entry: &Entry) -> bool {
        fn field_matches<T: PartialEq>(wanted: &Option<T>, actual: &Option<T>) -> bool {
            match wanted {
                Some(wanted) => actual.as_ref() == Some(wanted),
                None => true,
            }
        }

        field_matches(&self.id, &entry.id)
            && field_matches(&self.description, &entry.description)
            && field_matches(&self.month, &entry.month)
            && field_matches(&self.year, &entry.year)
            && field_matches(&self.value, &entry.value)
            && field_matches(&self.entry_type, &entry.entry_type)
            && field_matches(&self.status, &entry.status)
            && field_matches(&self.owner, &entry.owner)
    }
}

impl From<&Entry> for EntryFilter {
    fn from(example: &Entry) -> Self {
        Self {
            id: example.id,
            description: example.description.clone(),
            month: example.month,
            year: example.year,
            value: example.value,
            entry_type: example.entry_type,
            status: example.status,
            owner: example.owner,
        }
    }
}
