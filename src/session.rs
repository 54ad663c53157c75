use crate::balance::BalanceReport;
use crate::calendar::Day;
use crate::error::SessionError;
use crate::persistence::{PlanSnapshot, PlanStore};
use crate::planner::{Placement, Planner};
use crate::status::StatusChange;
use crate::task::{Task, TaskId, TaskStatus};
use tracing::{info, warn};

/// One user's planner bound to its persistence store.
///
/// Each mutating call updates the in-memory plan completely, then saves it.
/// When the save fails the error is returned but the change stays applied, so
/// a later [`Session::persist`] can retry.
pub struct Session<S: PlanStore> {
    user_key: String,
    planner: Planner,
    store: S,
}

impl<S: PlanStore> Session<S> {
    /// Hydrates `planner` from whatever `store` holds for `user_key`.
    pub async fn open(
        user_key: impl Into<String>,
        store: S,
        mut planner: Planner,
    ) -> Result<Self, SessionError> {
        let user_key = user_key.into();
        let snapshot = store.load(&user_key).await?;
        info!(user = %user_key, tasks = snapshot.tasks.len(), "opened session");
        planner.replace_store(snapshot.into_store()?);
        Ok(Self {
            user_key,
            planner,
            store,
        })
    }

    pub fn user_key(&self) -> &str {
        &self.user_key
    }

    pub fn planner(&self) -> &Planner {
        &self.planner
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub async fn persist(&self) -> Result<(), SessionError> {
        let snapshot = PlanSnapshot::from_store(self.planner.store());
        if let Err(err) = self.store.save(&self.user_key, &snapshot).await {
            warn!(user = %self.user_key, error = %err, "failed to persist plan");
            return Err(err.into());
        }
        Ok(())
    }

    pub async fn add_task(
        &mut self,
        title: &str,
        duration: &str,
        day: Day,
        status: TaskStatus,
    ) -> Result<Placement, SessionError> {
        let placement = self.planner.add_task(title, duration, day, status)?;
        self.persist().await?;
        Ok(placement)
    }

    pub async fn delete_task(&mut self, id: &TaskId) -> Result<bool, SessionError> {
        let removed = self.planner.delete_task(id);
        if removed {
            self.persist().await?;
        }
        Ok(removed)
    }

    pub async fn set_status(
        &mut self,
        id: &TaskId,
        status: TaskStatus,
    ) -> Result<StatusChange, SessionError> {
        let change = self.planner.set_status(id, status)?;
        self.persist().await?;
        Ok(change)
    }

    pub async fn move_task(&mut self, id: &TaskId, day: Day) -> Result<Placement, SessionError> {
        let placement = self.planner.move_task(id, day)?;
        self.persist().await?;
        Ok(placement)
    }

    pub async fn edit_task(
        &mut self,
        id: &TaskId,
        title: &str,
        duration: &str,
    ) -> Result<Placement, SessionError> {
        let placement = self.planner.edit_task(id, title, duration)?;
        self.persist().await?;
        Ok(placement)
    }

    pub async fn set_daily_limit(&mut self, minutes: i64) -> Result<Vec<BalanceReport>, SessionError> {
        let reports = self.planner.set_daily_limit(minutes)?;
        self.persist().await?;
        Ok(reports)
    }

    /// Replaces every task with `tasks`, keeping the daily limit.
    pub async fn replace_tasks(&mut self, tasks: Vec<Task>) -> Result<(), SessionError> {
        let snapshot = PlanSnapshot {
            tasks,
            daily_limit: self.planner.store().daily_limit(),
        };
        self.planner.replace_store(snapshot.into_store()?);
        self.persist().await
    }

    pub fn select_day(&mut self, day: Option<Day>) {
        self.planner.select_day(day);
    }

    pub async fn reset(&mut self) -> Result<(), SessionError> {
        self.planner.reset();
        self.persist().await
    }
}
