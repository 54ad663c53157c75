use crate::task::{Task, TaskStatus};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    pub completed: usize,
    pub not_completed: usize,
    pub approaching: usize,
    pub missed: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statistics {
    pub total: usize,
    pub counts: StatusCounts,
    pub total_minutes: u64,
    /// Rounded mean duration in minutes, 0 without tasks.
    pub average_duration: u64,
    /// Rounded share of completed tasks in percent, 0 without tasks.
    pub completion_rate: u64,
}

pub fn counts(tasks: &[Task]) -> StatusCounts {
    let mut counts = StatusCounts::default();
    for task in tasks {
        match task.status {
            TaskStatus::Completed => counts.completed += 1,
            TaskStatus::NotCompleted => counts.not_completed += 1,
            TaskStatus::Approaching => counts.approaching += 1,
            TaskStatus::Missed => counts.missed += 1,
        }
    }
    counts
}

pub fn statistics(tasks: &[Task]) -> Statistics {
    let total = tasks.len();
    let counts = counts(tasks);
    let total_minutes: u64 = tasks.iter().map(|task| u64::from(task.duration)).sum();
    if total == 0 {
        return Statistics::default();
    }

    Statistics {
        total,
        counts,
        total_minutes,
        average_duration: (total_minutes as f64 / total as f64).round() as u64,
        completion_rate: (counts.completed as f64 * 100.0 / total as f64).round() as u64,
    }
}
