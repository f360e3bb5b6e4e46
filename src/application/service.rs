use crate::storage::{EntryStore, Repository, UserStore};

use super::{AppError, EntryService, ServiceConfig, UserService};

/// Application services bundled over one store.
/// This is the primary interface for any client (CLI, tests, ...).
pub struct LedgerService<S> {
    users: UserService<S>,
    entries: EntryService<S>,
}

impl LedgerService<Repository> {
    /// Initialize a new database at the given path.
    pub async fn init(database_path: &str, config: ServiceConfig) -> Result<Self, AppError> {
        let db_url = format!("sqlite:{}?mode=rwc", database_path);
        let repo = Repository::init(&db_url).await?;
        tracing::debug!("Initialized database at {database_path}");
        Ok(Self::new(repo, config))
    }

    /// Connect to an existing database.
    pub async fn connect(database_path: &str, config: ServiceConfig) -> Result<Self, AppError> {
        let db_url = format!("sqlite:{}", database_path);
        let repo = Repository::connect(&db_url).await?;
        Ok(Self::new(repo, config))
    }
}

impl<S: UserStore + EntryStore + Clone> LedgerService<S> {
    pub fn new(store: S, config: ServiceConfig) -> Self {
        Self {
            users: UserService::new(store.clone(), config),
            entries: EntryService::new(store),
        }
    }

    pub fn users(&self) -> &UserService<S> {
        &self.users
    }

    pub fn entries(&self) -> &EntryService<S> {
        &self.entries
    }
}
