use crate::balance::{self, BalanceReport};
use crate::calendar::{Day, day_ahead};
use crate::ids::{Clock, IdSource};
use crate::notify::{Notice, Notifier};
use crate::store::TaskStore;
use crate::task::{Task, TaskId, TaskStatus};
use serde::Serialize;
use tracing::info;

pub const RESCHEDULE_OFFSET_DAYS: usize = 3;
pub const RESCHEDULED_PREFIX: &str = "RESCHEDULED: ";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reschedule {
    pub original_id: TaskId,
    pub target: Day,
    /// The spawned copy as it stands after balancing its target day.
    pub task: Task,
    pub balance: BalanceReport,
}

/// Spawns a `not-completed` copy of a missed task three days later and
/// balances the receiving day. The missed original is left where it is.
pub fn reschedule(
    store: &mut TaskStore,
    original: &Task,
    ids: &mut dyn IdSource,
    clock: &dyn Clock,
    notifier: &dyn Notifier,
) -> Reschedule {
    let target = day_ahead(original.day, RESCHEDULE_OFFSET_DAYS);

    let mut id = ids.next_id();
    while store.contains(&id) {
        id = ids.next_id();
    }

    let copy = Task::new(
        id.clone(),
        format!("{RESCHEDULED_PREFIX}{}", original.title),
        original.duration,
        target,
        TaskStatus::NotCompleted,
        clock.now(),
    );
    store.push(copy.clone());
    info!(original = %original.id, task = %id, from = %original.day, %target, "rescheduled missed task");

    let balance = balance::auto_balance(store, target, notifier);
    notifier.notify(&Notice::info(format!(
        "Task rescheduled to {target}: {}",
        original.title
    )));

    let task = store.find(&id).cloned().unwrap_or(copy);
    Reschedule {
        original_id: original.id.clone(),
        target,
        task,
        balance,
    }
}
