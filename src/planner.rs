use crate::balance::{self, BalanceReport};
use crate::calendar::Day;
use crate::error::PlannerError;
use crate::ids::{Clock, IdGenerator, IdSource, SystemClock};
use crate::notify::{Notifier, TracingNotifier};
use crate::reschedule;
use crate::statistics::{self, Statistics};
use crate::status::{self, StatusChange, Transition};
use crate::store::{DaySummary, TaskStore};
use crate::task::{Task, TaskId, TaskStatus};
use crate::validation;
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

/// A task as it stands after the balancing its placement triggered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Placement {
    pub task: Task,
    pub balance: BalanceReport,
}

/// Synchronous entry point to one user's schedule. Every mutation validates
/// first, applies completely, and leaves persistence to the caller.
pub struct Planner {
    store: TaskStore,
    ids: Box<dyn IdSource>,
    clock: Arc<dyn Clock>,
    notifier: Arc<dyn Notifier>,
}

impl Default for Planner {
    fn default() -> Self {
        Self::new(TaskStore::default())
    }
}

impl Planner {
    pub fn new(store: TaskStore) -> Self {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        Self {
            store,
            ids: Box::new(IdGenerator::new(clock.clone())),
            clock,
            notifier: Arc::new(TracingNotifier),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.ids = Box::new(IdGenerator::new(clock.clone()));
        self.clock = clock;
        self
    }

    pub fn with_ids(mut self, ids: Box<dyn IdSource>) -> Self {
        self.ids = ids;
        self
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn store(&self) -> &TaskStore {
        &self.store
    }

    /// Swaps in a freshly hydrated store, keeping ids, clock and notifier.
    pub fn replace_store(&mut self, store: TaskStore) {
        self.store = store;
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    pub fn find_task(&self, id: &TaskId) -> Option<&Task> {
        self.store.find(id)
    }

    pub fn day_total(&self, day: Day) -> u32 {
        self.store.day_total(day)
    }

    pub fn tasks_on_day(&self, day: Day) -> Vec<&Task> {
        self.store.tasks_on_day(day)
    }

    pub fn day_summaries(&self) -> Vec<DaySummary> {
        self.store.day_summaries()
    }

    pub fn statistics(&self) -> Statistics {
        statistics::statistics(self.store.tasks())
    }

    /// Validates raw title and duration input, appends the task, then balances `day`.
    pub fn add_task(
        &mut self,
        title: &str,
        duration: &str,
        day: Day,
        status: TaskStatus,
    ) -> Result<Placement, PlannerError> {
        let title = validation::validate_title(title)?;
        let duration = validation::validate_duration(duration)?;
        self.insert(title, duration, day, status)
    }

    pub fn add_task_minutes(
        &mut self,
        title: &str,
        minutes: i64,
        day: Day,
        status: TaskStatus,
    ) -> Result<Placement, PlannerError> {
        let title = validation::validate_title(title)?;
        let duration = validation::check_duration(minutes)?;
        self.insert(title, duration, day, status)
    }

    fn insert(
        &mut self,
        title: String,
        duration: u32,
        day: Day,
        status: TaskStatus,
    ) -> Result<Placement, PlannerError> {
        let id = self.fresh_id();
        let task = Task::new(id.clone(), title, duration, day, status, self.clock.now());
        info!(task = %id, %day, duration, "adding task");
        self.store.push(task);
        self.placement(&id, day)
    }

    pub fn delete_task(&mut self, id: &TaskId) -> bool {
        let removed = self.store.remove(id).is_some();
        if removed {
            info!(task = %id, "deleted task");
        }
        removed
    }

    pub fn set_status(
        &mut self,
        id: &TaskId,
        status: TaskStatus,
    ) -> Result<StatusChange, PlannerError> {
        let task = self
            .store
            .find(id)
            .ok_or_else(|| PlannerError::TaskNotFound(id.clone()))?;
        let previous = task.status;
        let transition = status::transition(previous, status)?;

        let mut rescheduled = None;
        if transition != Transition::Unchanged {
            let Some(task) = self.store.task_mut(id) else {
                return Err(PlannerError::TaskNotFound(id.clone()));
            };
            task.status = status;
            let original = task.clone();
            info!(task = %id, from = %previous, to = %status, "status changed");

            if transition == Transition::EnterMissed {
                rescheduled = Some(reschedule::reschedule(
                    &mut self.store,
                    &original,
                    self.ids.as_mut(),
                    self.clock.as_ref(),
                    self.notifier.as_ref(),
                ));
            }
        }

        let task = self
            .store
            .find(id)
            .cloned()
            .ok_or_else(|| PlannerError::TaskNotFound(id.clone()))?;
        Ok(StatusChange {
            previous,
            task,
            rescheduled,
        })
    }

    /// Moves a task to `day` and balances the receiving day.
    pub fn move_task(&mut self, id: &TaskId, day: Day) -> Result<Placement, PlannerError> {
        let task = self
            .store
            .task_mut(id)
            .ok_or_else(|| PlannerError::TaskNotFound(id.clone()))?;
        let from = task.day;
        task.day = day;
        info!(task = %id, %from, to = %day, "moved task");
        self.placement(id, day)
    }

    pub fn edit_task(
        &mut self,
        id: &TaskId,
        title: &str,
        duration: &str,
    ) -> Result<Placement, PlannerError> {
        if !self.store.contains(id) {
            return Err(PlannerError::TaskNotFound(id.clone()));
        }
        let title = validation::validate_title(title)?;
        let duration = validation::validate_duration(duration)?;

        let task = self
            .store
            .task_mut(id)
            .ok_or_else(|| PlannerError::TaskNotFound(id.clone()))?;
        task.title = title;
        task.duration = duration;
        let day = task.day;
        self.placement(id, day)
    }

    /// Applies a new limit and balances every day in week order. Only the
    /// runs that moved something or warned are returned.
    pub fn set_daily_limit(&mut self, minutes: i64) -> Result<Vec<BalanceReport>, PlannerError> {
        let limit = validation::validate_daily_limit(minutes)?;
        self.store.set_daily_limit(limit);
        info!(limit, "daily limit changed");

        let reports = Day::ALL
            .iter()
            .map(|day| self.auto_balance(*day))
            .filter(|report| !report.relocations.is_empty() || !report.is_balanced())
            .collect();
        Ok(reports)
    }

    pub fn auto_balance(&mut self, day: Day) -> BalanceReport {
        balance::auto_balance(&mut self.store, day, self.notifier.as_ref())
    }

    pub fn select_day(&mut self, day: Option<Day>) {
        self.store.set_selected_day(day);
    }

    pub fn reset(&mut self) {
        self.store.clear();
        info!("schedule reset");
    }

    fn fresh_id(&mut self) -> TaskId {
        let mut id = self.ids.next_id();
        while self.store.contains(&id) {
            id = self.ids.next_id();
        }
        id
    }

    fn placement(&mut self, id: &TaskId, day: Day) -> Result<Placement, PlannerError> {
        let balance = self.auto_balance(day);
        let task = self
            .store
            .find(id)
            .cloned()
            .ok_or_else(|| PlannerError::TaskNotFound(id.clone()))?;
        Ok(Placement { task, balance })
    }
}
