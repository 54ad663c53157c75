use std::sync::Arc;

use chrono::{TimeZone, Utc};
use study_planner::{
    BalanceOutcome, Day, FixedClock, MAX_BALANCE_ATTEMPTS, NoticeLog, Planner, Severity,
    TaskStatus, TaskStore,
};

fn planner_with_limit(limit: u32) -> (Planner, Arc<NoticeLog>) {
    let notices = Arc::new(NoticeLog::new());
    let clock = Arc::new(FixedClock(Utc.with_ymd_and_hms(2025, 3, 3, 8, 0, 0).unwrap()));
    let planner = Planner::new(TaskStore::with_daily_limit(limit))
        .with_clock(clock)
        .with_notifier(notices.clone());
    (planner, notices)
}

fn add(planner: &mut Planner, title: &str, minutes: i64, day: Day) -> study_planner::Placement {
    planner
        .add_task_minutes(title, minutes, day, TaskStatus::NotCompleted)
        .expect("valid task")
}

#[test]
fn over_limit_day_without_a_fitting_task_stays_put() {
    let (mut planner, notices) = planner_with_limit(150);
    add(&mut planner, "Algebra", 100, Day::Monday);
    let placement = add(&mut planner, "Physics", 80, Day::Monday);

    assert_eq!(
        placement.balance.outcome,
        BalanceOutcome::CannotRedistribute {
            day: Day::Monday,
            excess: 30
        }
    );
    assert!(placement.balance.relocations.is_empty());
    assert_eq!(planner.day_total(Day::Monday), 180);
    assert_eq!(placement.task.day, Day::Monday);

    let warnings: Vec<_> = notices
        .drain()
        .into_iter()
        .filter(|n| n.severity == Severity::Warning)
        .collect();
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].message.contains("monday"));
}

#[test]
fn day_within_limit_needs_no_balancing() {
    let (mut planner, notices) = planner_with_limit(150);
    add(&mut planner, "Algebra", 100, Day::Monday);
    let placement = add(&mut planner, "Physics", 40, Day::Monday);

    assert!(placement.balance.is_balanced());
    assert!(placement.balance.relocations.is_empty());
    assert_eq!(planner.day_total(Day::Monday), 140);
    assert!(notices.drain().is_empty());
}

#[test]
fn small_excess_with_large_tasks_only_warns() {
    let (mut planner, notices) = planner_with_limit(150);
    add(&mut planner, "History", 60, Day::Monday);
    let placement = add(&mut planner, "Chemistry", 100, Day::Monday);

    assert_eq!(
        placement.balance.outcome,
        BalanceOutcome::CannotRedistribute {
            day: Day::Monday,
            excess: 10
        }
    );
    assert_eq!(planner.day_total(Day::Monday), 160);
    assert_eq!(notices.drain().len(), 1);
}

#[test]
fn smallest_fitting_task_moves_and_later_wins_ties() {
    let (mut planner, _) = planner_with_limit(150);
    add(&mut planner, "Essay", 40, Day::Monday);
    add(&mut planner, "Flashcards A", 20, Day::Monday);
    let later = add(&mut planner, "Flashcards B", 20, Day::Monday);
    let placement = add(&mut planner, "Lab report", 100, Day::Monday);

    // 180 minutes against 150: both 20-minute tasks fit the 30-minute excess.
    assert!(placement.balance.is_balanced());
    assert_eq!(placement.balance.relocations.len(), 1);
    let moved = &placement.balance.relocations[0];
    assert_eq!(moved.task_id, later.task.id);
    assert_eq!(moved.from, Day::Monday);
    assert_eq!(moved.to, Day::Tuesday);

    // One move per step: Monday keeps its remaining 160 minutes.
    assert_eq!(planner.day_total(Day::Monday), 160);
    assert_eq!(planner.day_total(Day::Tuesday), 20);
    assert_eq!(planner.find_task(&later.task.id).unwrap().day, Day::Tuesday);
}

#[test]
fn relocation_cascades_into_the_next_day() {
    let (mut planner, notices) = planner_with_limit(150);
    add(&mut planner, "Thesis draft", 140, Day::Tuesday);
    add(&mut planner, "Reading", 120, Day::Monday);
    let small = add(&mut planner, "Quiz prep", 20, Day::Monday);
    let placement = add(&mut planner, "Problem set", 30, Day::Monday);

    // Monday 170: the 20-minute task moves; Tuesday then sits at 160 with
    // nothing small enough to move on.
    assert_eq!(placement.balance.relocations.len(), 1);
    assert_eq!(placement.balance.relocations[0].task_id, small.task.id);
    assert_eq!(placement.balance.stopped_at, Day::Tuesday);
    assert_eq!(
        placement.balance.outcome,
        BalanceOutcome::CannotRedistribute {
            day: Day::Tuesday,
            excess: 10
        }
    );
    assert_eq!(planner.day_total(Day::Monday), 150);
    assert_eq!(planner.day_total(Day::Tuesday), 160);
    assert_eq!(notices.drain().len(), 1);
}

#[test]
fn completed_and_missed_tasks_are_never_relocated() {
    let (mut planner, _) = planner_with_limit(150);
    planner
        .add_task_minutes("Done already", 20, Day::Friday, TaskStatus::Completed)
        .unwrap();
    planner
        .add_task_minutes("Skipped", 20, Day::Friday, TaskStatus::Missed)
        .unwrap();
    let placement = add(&mut planner, "Big review", 150, Day::Friday);

    assert_eq!(
        placement.balance.outcome,
        BalanceOutcome::CannotRedistribute {
            day: Day::Friday,
            excess: 20
        }
    );
    assert_eq!(planner.day_total(Day::Friday), 170);
}

#[test]
fn zero_limit_cycles_once_around_the_week_then_gives_up() {
    let (mut planner, notices) = planner_with_limit(0);
    let placement = add(&mut planner, "Anything", 30, Day::Monday);

    assert_eq!(placement.balance.outcome, BalanceOutcome::CannotBalance);
    assert_eq!(placement.balance.relocations.len(), MAX_BALANCE_ATTEMPTS);
    assert_eq!(placement.balance.stopped_at, Day::Monday);
    assert_eq!(placement.task.day, Day::Monday);

    let path: Vec<Day> = placement
        .balance
        .relocations
        .iter()
        .map(|r| r.to)
        .collect();
    assert_eq!(
        path,
        vec![
            Day::Tuesday,
            Day::Wednesday,
            Day::Thursday,
            Day::Friday,
            Day::Saturday,
            Day::Sunday,
            Day::Monday,
        ]
    );

    let notices = notices.drain();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].severity, Severity::Warning);
}

#[test]
fn lowering_the_limit_rebalances_every_day() {
    let (mut planner, _) = planner_with_limit(150);
    add(&mut planner, "Long read", 70, Day::Wednesday);
    add(&mut planner, "Short read", 30, Day::Wednesday);

    let reports = planner.set_daily_limit(70).unwrap();
    assert_eq!(planner.store().daily_limit(), 70);
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].start, Day::Wednesday);
    assert!(reports[0].is_balanced());
    assert_eq!(planner.day_total(Day::Wednesday), 70);
    assert_eq!(planner.day_total(Day::Thursday), 30);
}

#[test]
fn invalid_limits_are_rejected_without_change() {
    let (mut planner, _) = planner_with_limit(150);
    assert!(planner.set_daily_limit(0).is_err());
    assert!(planner.set_daily_limit(5000).is_err());
    assert_eq!(planner.store().daily_limit(), 150);
}
