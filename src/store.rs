use crate::calendar::Day;
use crate::task::{Task, TaskId};
use serde::{Deserialize, Serialize};

pub const DEFAULT_DAILY_LIMIT: u32 = 150;

/// Load figures for one day of the week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaySummary {
    pub day: Day,
    pub task_count: usize,
    pub total_minutes: u32,
    pub remaining_minutes: u32,
    pub over_limit: bool,
}

/// Insertion-ordered tasks of one user plus the daily time budget.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskStore {
    tasks: Vec<Task>,
    daily_limit: u32,
    selected_day: Option<Day>,
}

impl Default for TaskStore {
    fn default() -> Self {
        Self::with_daily_limit(DEFAULT_DAILY_LIMIT)
    }
}

impl TaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Any limit is accepted here, including 0; user input goes through
    /// `validation::validate_daily_limit` first.
    pub fn with_daily_limit(daily_limit: u32) -> Self {
        Self {
            tasks: Vec::new(),
            daily_limit,
            selected_day: None,
        }
    }

    pub(crate) fn from_parts(tasks: Vec<Task>, daily_limit: u32) -> Self {
        Self {
            tasks,
            daily_limit,
            selected_day: None,
        }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn daily_limit(&self) -> u32 {
        self.daily_limit
    }

    pub fn selected_day(&self) -> Option<Day> {
        self.selected_day
    }

    pub fn find(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| &task.id == id)
    }

    pub fn contains(&self, id: &TaskId) -> bool {
        self.find(id).is_some()
    }

    /// Sum of durations on `day`, ignoring missed tasks.
    pub fn day_total(&self, day: Day) -> u32 {
        self.tasks
            .iter()
            .filter(|task| task.day == day && task.counts_toward_load())
            .map(|task| task.duration)
            .sum()
    }

    pub fn tasks_on_day(&self, day: Day) -> Vec<&Task> {
        self.tasks.iter().filter(|task| task.day == day).collect()
    }

    pub fn day_summary(&self, day: Day) -> DaySummary {
        let total_minutes = self.day_total(day);
        DaySummary {
            day,
            task_count: self.tasks.iter().filter(|task| task.day == day).count(),
            total_minutes,
            remaining_minutes: self.daily_limit.saturating_sub(total_minutes),
            over_limit: total_minutes > self.daily_limit,
        }
    }

    pub fn day_summaries(&self) -> Vec<DaySummary> {
        Day::ALL.iter().map(|day| self.day_summary(*day)).collect()
    }

    pub(crate) fn push(&mut self, task: Task) {
        self.tasks.push(task);
    }

    pub(crate) fn task_mut(&mut self, id: &TaskId) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|task| &task.id == id)
    }

    pub(crate) fn task_at_mut(&mut self, index: usize) -> Option<&mut Task> {
        self.tasks.get_mut(index)
    }

    pub(crate) fn remove(&mut self, id: &TaskId) -> Option<Task> {
        let index = self.tasks.iter().position(|task| &task.id == id)?;
        Some(self.tasks.remove(index))
    }

    pub(crate) fn set_daily_limit(&mut self, daily_limit: u32) {
        self.daily_limit = daily_limit;
    }

    pub(crate) fn set_selected_day(&mut self, day: Option<Day>) {
        self.selected_day = day;
    }

    pub(crate) fn clear(&mut self) {
        self.tasks.clear();
        self.selected_day = None;
    }
}
