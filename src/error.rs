use crate::calendar::CalendarError;
use crate::persistence::PersistenceError;
use crate::status::IllegalTransition;
use crate::task::{TaskId, UnknownStatus};
use crate::validation::ValidationError;
use thiserror::Error;

/// Errors raised by planner operations. None of them leaves a partial mutation behind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlannerError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Calendar(#[from] CalendarError),

    #[error(transparent)]
    UnknownStatus(#[from] UnknownStatus),

    #[error("task {0} not found")]
    TaskNotFound(TaskId),

    #[error(transparent)]
    IllegalTransition(#[from] IllegalTransition),
}

/// Errors from a persisted session. A `Persistence` failure is reported after
/// the in-memory change has already been applied; it is not rolled back.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Planner(#[from] PlannerError),

    #[error("failed to persist plan: {0}")]
    Persistence(#[from] PersistenceError),
}
