//! Daily-limit balancing.
//!
//! Starting from the day that just received work, the over-limit excess is
//! relieved by moving one `not-completed` task to the following day, then the
//! receiving day is checked in turn. At most one task moves per step and at
//! most [`MAX_BALANCE_ATTEMPTS`] steps run, so a week whose total load cannot
//! fit still terminates with a warning instead of cycling.

use crate::calendar::Day;
use crate::notify::{Notice, Notifier};
use crate::store::TaskStore;
use crate::task::TaskId;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

pub const MAX_BALANCE_ATTEMPTS: usize = 7;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relocation {
    pub task_id: TaskId,
    pub duration: u32,
    pub from: Day,
    pub to: Day,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BalanceOutcome {
    Balanced,
    /// `day` is over the limit and none of its movable tasks fit in `excess`.
    CannotRedistribute { day: Day, excess: u32 },
    /// Every attempt moved a task but the chain never settled.
    CannotBalance,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceReport {
    pub start: Day,
    pub stopped_at: Day,
    pub relocations: Vec<Relocation>,
    pub outcome: BalanceOutcome,
}

impl BalanceReport {
    pub fn is_balanced(&self) -> bool {
        self.outcome == BalanceOutcome::Balanced
    }

    pub fn warning(&self) -> Option<Notice> {
        match &self.outcome {
            BalanceOutcome::Balanced => None,
            BalanceOutcome::CannotRedistribute { day, excess } => Some(Notice::warning(format!(
                "Cannot redistribute tasks on {day}: no movable task fits the {excess}-minute overflow"
            ))),
            BalanceOutcome::CannotBalance => Some(Notice::warning(format!(
                "Cannot balance the schedule from {} within {MAX_BALANCE_ATTEMPTS} attempts",
                self.start
            ))),
        }
    }
}

pub fn auto_balance(store: &mut TaskStore, start: Day, notifier: &dyn Notifier) -> BalanceReport {
    let limit = store.daily_limit();
    let mut current = start;
    let mut relocations = Vec::new();

    for _ in 0..MAX_BALANCE_ATTEMPTS {
        let total = store.day_total(current);
        if total <= limit {
            return finish(start, current, relocations, BalanceOutcome::Balanced, notifier);
        }
        let excess = total - limit;

        let Some(index) = select_relocation(store, current, excess) else {
            let outcome = BalanceOutcome::CannotRedistribute {
                day: current,
                excess,
            };
            return finish(start, current, relocations, outcome, notifier);
        };

        let to = current.next();
        if let Some(task) = store.task_at_mut(index) {
            debug!(task = %task.id, duration = task.duration, from = %current, %to, "relocating task");
            task.day = to;
            relocations.push(Relocation {
                task_id: task.id.clone(),
                duration: task.duration,
                from: current,
                to,
            });
        }
        current = to;
    }

    finish(start, current, relocations, BalanceOutcome::CannotBalance, notifier)
}

/// Store index of the task to move off `day`. Candidates are ordered largest
/// first and the last one that fits within `excess` wins, which is the
/// smallest fitting task (later store position on equal durations).
fn select_relocation(store: &TaskStore, day: Day, excess: u32) -> Option<usize> {
    let mut candidates: Vec<(usize, u32)> = store
        .tasks()
        .iter()
        .enumerate()
        .filter(|(_, task)| task.day == day && task.status.is_relocatable())
        .map(|(index, task)| (index, task.duration))
        .collect();
    candidates.sort_by(|a, b| b.1.cmp(&a.1));

    candidates
        .iter()
        .rev()
        .find(|(_, duration)| *duration <= excess)
        .map(|(index, _)| *index)
}

fn finish(
    start: Day,
    stopped_at: Day,
    relocations: Vec<Relocation>,
    outcome: BalanceOutcome,
    notifier: &dyn Notifier,
) -> BalanceReport {
    let report = BalanceReport {
        start,
        stopped_at,
        relocations,
        outcome,
    };
    if let Some(notice) = report.warning() {
        warn!(%start, stopped_at = %report.stopped_at, moved = report.relocations.len(), "{}", notice.message);
        notifier.notify(&notice);
    }
    report
}
