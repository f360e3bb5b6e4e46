use anyhow::{Context, Result};
use chrono::NaiveDate;
use sqlx::{Row, SqlitePool};

use crate::domain::{
    Cents, Entry, EntryFilter, EntryId, EntryStatus, EntryType, PasswordHash, User, UserId,
};

use super::{EntryStore, MIGRATION_001_INITIAL, UserStore};

const DATE_FORMAT: &str = "%Y-%m-%d";

const ENTRY_COLUMNS: &str =
    "id, description, month, year, value_cents, entry_type, status, user_id, registered_at";

/// SQLite-backed store for users and entries.
#[derive(Clone)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    /// Create a new repository with the given SQLite connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Connect to a SQLite database at the given URL.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = SqlitePool::connect(database_url)
            .await
            .context("Failed to connect to database")?;
        Ok(Self::new(pool))
    }

    /// Run database migrations.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::query(MIGRATION_001_INITIAL)
            .execute(&self.pool)
            .await
            .context("Failed to run migration 001")?;
        Ok(())
    }

    /// Initialize a new database (connect + migrate).
    pub async fn init(database_url: &str) -> Result<Self> {
        let repo = Self::connect(database_url).await?;
        repo.migrate().await?;
        Ok(repo)
    }

    // ========================
    // Users
    // ========================

    fn row_to_user(row: &sqlx::sqlite::SqliteRow) -> Result<User> {
        let password: String = row.get("password");

        Ok(User {
            id: Some(row.get("id")),
            name: row.get("name"),
            email: row.get("email"),
            password: PasswordHash::new_unchecked(password),
        })
    }

    // ========================
    // Entries
    // ========================

    async fn insert_entry(&self, entry: &Entry) -> Result<Entry> {
        let result = sqlx::query(
            r#"
            INSERT INTO entries (description, month, year, value_cents, entry_type, status, user_id, registered_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&entry.description)
        .bind(entry.month.map(i64::from))
        .bind(entry.year)
        .bind(entry.value)
        .bind(entry.entry_type.map(|t| t.as_str()))
        .bind(entry.status.map(|s| s.as_str()))
        .bind(entry.owner)
        .bind(entry.registered_at.map(|d| d.format(DATE_FORMAT).to_string()))
        .execute(&self.pool)
        .await
        .context("Failed to insert entry")?;

        let id = result.last_insert_rowid();
        tracing::debug!("Inserted entry {id}");

        Ok(Entry {
            id: Some(id),
            ..entry.clone()
        })
    }

    async fn update_entry(&self, id: EntryId, entry: &Entry) -> Result<Entry> {
        let result = sqlx::query(
            r#"
            UPDATE entries
            SET description = ?, month = ?, year = ?, value_cents = ?, entry_type = ?, status = ?, user_id = ?, registered_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&entry.description)
        .bind(entry.month.map(i64::from))
        .bind(entry.year)
        .bind(entry.value)
        .bind(entry.entry_type.map(|t| t.as_str()))
        .bind(entry.status.map(|s| s.as_str()))
        .bind(entry.owner)
        .bind(entry.registered_at.map(|d| d.format(DATE_FORMAT).to_string()))
        .bind(id)
        .execute(&self.pool)
        .await
        .context("Failed to update entry")?;

        if result.rows_affected() == 0 {
            anyhow::bail!("Entry {id} does not exist");
        }

        Ok(entry.clone())
    }

    fn row_to_entry(row: &sqlx::sqlite::SqliteRow) -> Result<Entry> {
        let month: Option<i64> = row.get("month");
        let entry_type_str: Option<String> = row.get("entry_type");
        let status_str: Option<String> = row.get("status");
        let registered_at_str: Option<String> = row.get("registered_at");

        Ok(Entry {
            id: Some(row.get("id")),
            description: row.get("description"),
            month: month
                .map(u32::try_from)
                .transpose()
                .context("Invalid month")?,
            year: row.get("year"),
            value: row.get("value_cents"),
            entry_type: entry_type_str
                .map(|s| {
                    EntryType::from_str(&s)
                        .ok_or_else(|| anyhow::anyhow!("Invalid entry type: {}", s))
                })
                .transpose()?,
            status: status_str
                .map(|s| {
                    EntryStatus::from_str(&s)
                        .ok_or_else(|| anyhow::anyhow!("Invalid entry status: {}", s))
                })
                .transpose()?,
            owner: row.get("user_id"),
            registered_at: registered_at_str
                .map(|s| NaiveDate::parse_from_str(&s, DATE_FORMAT))
                .transpose()
                .context("Invalid registered_at date")?,
        })
    }
}

impl UserStore for Repository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let row = sqlx::query("SELECT id, name, email, password FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch user by email")?;

        row.as_ref().map(Self::row_to_user).transpose()
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool> {
        let row = sqlx::query("SELECT EXISTS(SELECT 1 FROM users WHERE email = ?) as found")
            .bind(email)
            .fetch_one(&self.pool)
            .await
            .context("Failed to check user email")?;

        Ok(row.get::<i64, _>("found") != 0)
    }

    async fn save(&self, user: &User) -> Result<User> {
        let result = sqlx::query("INSERT INTO users (name, email, password) VALUES (?, ?, ?)")
            .bind(&user.name)
            .bind(&user.email)
            .bind(user.password.as_str())
            .execute(&self.pool)
            .await
            .context("Failed to save user")?;

        Ok(user.clone().with_id(result.last_insert_rowid()))
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>> {
        let row = sqlx::query("SELECT id, name, email, password FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch user")?;

        row.as_ref().map(Self::row_to_user).transpose()
    }
}

impl EntryStore for Repository {
    async fn save(&self, entry: &Entry) -> Result<Entry> {
        match entry.id {
            Some(id) if id != 0 => self.update_entry(id, entry).await,
            _ => self.insert_entry(entry).await,
        }
    }

    async fn delete(&self, entry: &Entry) -> Result<()> {
        sqlx::query("DELETE FROM entries WHERE id = ?")
            .bind(entry.id)
            .execute(&self.pool)
            .await
            .context("Failed to delete entry")?;
        Ok(())
    }

    async fn find_by_id(&self, id: EntryId) -> Result<Option<Entry>> {
        let row = sqlx::query(&format!("SELECT {ENTRY_COLUMNS} FROM entries WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch entry")?;

        row.as_ref().map(Self::row_to_entry).transpose()
    }

    async fn find_all(&self, filter: &EntryFilter) -> Result<Vec<Entry>> {
        let mut query = format!("SELECT {ENTRY_COLUMNS} FROM entries WHERE 1=1");

        if filter.id.is_some() {
            query.push_str(" AND id = ?");
        }
        if filter.description.is_some() {
            query.push_str(" AND description = ?");
        }
        if filter.month.is_some() {
            query.push_str(" AND month = ?");
        }
        if filter.year.is_some() {
            query.push_str(" AND year = ?");
        }
        if filter.value.is_some() {
            query.push_str(" AND value_cents = ?");
        }
        if filter.entry_type.is_some() {
            query.push_str(" AND entry_type = ?");
        }
        if filter.status.is_some() {
            query.push_str(" AND status = ?");
        }
        if filter.owner.is_some() {
            query.push_str(" AND user_id = ?");
        }
        query.push_str(" ORDER BY id");

        // Bind in the same order the predicates were appended
        let mut sql_query = sqlx::query(&query);
        if let Some(id) = filter.id {
            sql_query = sql_query.bind(id);
        }
        if let Some(description) = &filter.description {
            sql_query = sql_query.bind(description.clone());
        }
        if let Some(month) = filter.month {
            sql_query = sql_query.bind(i64::from(month));
        }
        if let Some(year) = filter.year {
            sql_query = sql_query.bind(year);
        }
        if let Some(value) = filter.value {
            sql_query = sql_query.bind(value);
        }
        if let Some(entry_type) = filter.entry_type {
            sql_query = sql_query.bind(entry_type.as_str());
        }
        if let Some(status) = filter.status {
            sql_query = sql_query.bind(status.as_str());
        }
        if let Some(owner) = filter.owner {
            sql_query = sql_query.bind(owner);
        }

        let rows = sql_query
            .fetch_all(&self.pool)
            .await
            .context("Failed to list entries")?;

        rows.iter().map(Self::row_to_entry).collect()
    }

    async fn sum_by_user_type_status(
        &self,
        owner: UserId,
        entry_type: EntryType,
        status: EntryStatus,
    ) -> Result<Option<Cents>> {
        let row = sqlx::query(
            r#"
            SELECT SUM(value_cents) as total
            FROM entries
            WHERE user_id = ? AND entry_type = ? AND status = ?
            "#,
        )
        .bind(owner)
        .bind(entry_type.as_str())
        .bind(status.as_str())
        .fetch_one(&self.pool)
        .await
        .context("Failed to sum entries")?;

        Ok(row.get("total"))
    }
}
