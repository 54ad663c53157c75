use crate::reschedule::Reschedule;
use crate::task::{Task, TaskStatus};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot change status from {from} to {to}")]
pub struct IllegalTransition {
    pub from: TaskStatus,
    pub to: TaskStatus,
}

/// How a legal status change must be applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Same status as before; nothing to do.
    Unchanged,
    Plain,
    /// Entering `missed`; spawns a rescheduled copy.
    EnterMissed,
}

pub fn transition(from: TaskStatus, to: TaskStatus) -> Result<Transition, IllegalTransition> {
    match (from, to) {
        (TaskStatus::Completed, TaskStatus::Missed) => Err(IllegalTransition { from, to }),
        (from, to) if from == to => Ok(Transition::Unchanged),
        (_, TaskStatus::Missed) => Ok(Transition::EnterMissed),
        _ => Ok(Transition::Plain),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusChange {
    pub previous: TaskStatus,
    pub task: Task,
    pub rescheduled: Option<Reschedule>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_completed_to_missed_is_rejected() {
        for from in TaskStatus::ALL {
            for to in TaskStatus::ALL {
                let result = transition(from, to);
                if from == TaskStatus::Completed && to == TaskStatus::Missed {
                    assert_eq!(result, Err(IllegalTransition { from, to }));
                } else {
                    assert!(result.is_ok(), "{from} -> {to} should be legal");
                }
            }
        }
    }

    #[test]
    fn entering_missed_is_flagged() {
        assert_eq!(
            transition(TaskStatus::NotCompleted, TaskStatus::Missed),
            Ok(Transition::EnterMissed)
        );
        assert_eq!(
            transition(TaskStatus::Approaching, TaskStatus::Missed),
            Ok(Transition::EnterMissed)
        );
        assert_eq!(
            transition(TaskStatus::Missed, TaskStatus::Missed),
            Ok(Transition::Unchanged)
        );
        assert_eq!(
            transition(TaskStatus::Missed, TaskStatus::Completed),
            Ok(Transition::Plain)
        );
    }
}
