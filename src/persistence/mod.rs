use crate::config::{StorageBackend, StorageConfig};
use crate::reschedule::RESCHEDULED_PREFIX;
use crate::store::{DEFAULT_DAILY_LIMIT, TaskStore};
use crate::task::Task;
use crate::validation;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::future::Future;
use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[cfg(feature = "sqlite")]
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("invalid data: {0}")]
    InvalidData(String),
    #[error("invalid user key '{0}' (use letters, digits, '-' or '_')")]
    InvalidUserKey(String),
    #[error("storage lock poisoned")]
    Poisoned,
}

pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// The persisted form of one user's plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanSnapshot {
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default = "default_daily_limit")]
    pub daily_limit: u32,
}

fn default_daily_limit() -> u32 {
    DEFAULT_DAILY_LIMIT
}

impl Default for PlanSnapshot {
    fn default() -> Self {
        Self {
            tasks: Vec::new(),
            daily_limit: DEFAULT_DAILY_LIMIT,
        }
    }
}

impl PlanSnapshot {
    pub fn from_store(store: &TaskStore) -> Self {
        Self {
            tasks: store.tasks().to_vec(),
            daily_limit: store.daily_limit(),
        }
    }

    /// Checks every task and the daily limit before building a store.
    pub fn into_store(self) -> PersistenceResult<TaskStore> {
        validation::validate_daily_limit(i64::from(self.daily_limit))
            .map_err(|err| PersistenceError::InvalidData(err.to_string()))?;
        validate_tasks(&self.tasks)?;
        Ok(TaskStore::from_parts(self.tasks, self.daily_limit))
    }
}

/// Keyed document storage for plans. A user with nothing stored loads as
/// `PlanSnapshot::default()`.
pub trait PlanStore: Send + Sync {
    fn load(&self, user_key: &str) -> impl Future<Output = PersistenceResult<PlanSnapshot>> + Send;

    fn save(
        &self,
        user_key: &str,
        snapshot: &PlanSnapshot,
    ) -> impl Future<Output = PersistenceResult<()>> + Send;
}

pub fn validate_tasks(tasks: &[Task]) -> PersistenceResult<()> {
    let mut seen_ids = HashSet::with_capacity(tasks.len());
    for task in tasks {
        if !seen_ids.insert(&task.id) {
            return Err(PersistenceError::InvalidData(format!(
                "duplicate task id {}",
                task.id
            )));
        }
        let title = normalize_title(&task.title).map_err(|err| {
            PersistenceError::InvalidData(format!("task {}: {err}", task.id))
        })?;
        if title != task.title {
            return Err(PersistenceError::InvalidData(format!(
                "task {} has an unescaped title",
                task.id
            )));
        }
        validation::check_duration(i64::from(task.duration)).map_err(|err| {
            PersistenceError::InvalidData(format!("task {}: {err}", task.id))
        })?;
    }
    Ok(())
}

/// Validates a title read from outside the planner. Leading reschedule
/// prefixes are kept as they are and do not count toward the length limit.
pub fn normalize_title(title: &str) -> Result<String, validation::ValidationError> {
    let mut rest = title.trim();
    let mut prefixes = 0;
    while let Some(stripped) = rest.strip_prefix(RESCHEDULED_PREFIX) {
        rest = stripped;
        prefixes += 1;
    }
    let base = validation::validate_title(rest)?;
    Ok(format!("{}{base}", RESCHEDULED_PREFIX.repeat(prefixes)))
}

pub(crate) fn check_user_key(user_key: &str) -> PersistenceResult<()> {
    let valid = !user_key.is_empty()
        && user_key
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || ch == '-' || ch == '_');
    if valid {
        Ok(())
    } else {
        Err(PersistenceError::InvalidUserKey(user_key.to_string()))
    }
}

/// A store picked at runtime from configuration.
pub enum Backend {
    Json(JsonDirStore),
    #[cfg(feature = "sqlite")]
    Sqlite(SqlitePlanStore),
    Memory(MemoryPlanStore),
}

impl Backend {
    pub fn open(config: &StorageConfig) -> PersistenceResult<Self> {
        match config.backend {
            StorageBackend::Json => Ok(Backend::Json(JsonDirStore::new(&config.path))),
            #[cfg(feature = "sqlite")]
            StorageBackend::Sqlite => Ok(Backend::Sqlite(SqlitePlanStore::new(&config.path)?)),
            #[cfg(not(feature = "sqlite"))]
            StorageBackend::Sqlite => Err(PersistenceError::InvalidData(
                "sqlite storage requires the `sqlite` feature".to_string(),
            )),
            StorageBackend::Memory => Ok(Backend::Memory(MemoryPlanStore::new())),
        }
    }
}

impl PlanStore for Backend {
    async fn load(&self, user_key: &str) -> PersistenceResult<PlanSnapshot> {
        match self {
            Backend::Json(store) => store.load(user_key).await,
            #[cfg(feature = "sqlite")]
            Backend::Sqlite(store) => store.load(user_key).await,
            Backend::Memory(store) => store.load(user_key).await,
        }
    }

    async fn save(&self, user_key: &str, snapshot: &PlanSnapshot) -> PersistenceResult<()> {
        match self {
            Backend::Json(store) => store.save(user_key, snapshot).await,
            #[cfg(feature = "sqlite")]
            Backend::Sqlite(store) => store.save(user_key, snapshot).await,
            Backend::Memory(store) => store.save(user_key, snapshot).await,
        }
    }
}

pub mod file;
pub mod memory;
#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use file::{JsonDirStore, export_tasks_to_csv, import_tasks_from_csv};
pub use memory::MemoryPlanStore;
#[cfg(feature = "sqlite")]
pub use sqlite::SqlitePlanStore;
