use study_planner::{Day, Planner, Statistics, StatusCounts, TaskStatus};

#[test]
fn empty_plan_has_zeroed_statistics() {
    let planner = Planner::default();
    assert_eq!(planner.statistics(), Statistics::default());
}

#[test]
fn statistics_count_every_status_and_round() {
    let mut planner = Planner::default();
    for (title, minutes, day, status) in [
        ("Algebra", 30, Day::Monday, TaskStatus::Completed),
        ("Biology", 45, Day::Tuesday, TaskStatus::NotCompleted),
        ("Chemistry", 20, Day::Wednesday, TaskStatus::Approaching),
    ] {
        planner.add_task_minutes(title, minutes, day, status).unwrap();
    }

    let stats = planner.statistics();
    assert_eq!(stats.total, 3);
    assert_eq!(
        stats.counts,
        StatusCounts {
            completed: 1,
            not_completed: 1,
            approaching: 1,
            missed: 0,
        }
    );
    assert_eq!(stats.total_minutes, 95);
    // 95 / 3 = 31.67
    assert_eq!(stats.average_duration, 32);
    // 1 / 3 = 33.3%
    assert_eq!(stats.completion_rate, 33);
}

#[test]
fn missed_originals_and_their_copies_are_both_counted() {
    let mut planner = Planner::default();
    let task = planner
        .add_task_minutes("Reading", 40, Day::Monday, TaskStatus::NotCompleted)
        .unwrap()
        .task;
    planner.set_status(&task.id, TaskStatus::Missed).unwrap();

    let stats = planner.statistics();
    assert_eq!(stats.total, 2);
    assert_eq!(stats.counts.missed, 1);
    assert_eq!(stats.counts.not_completed, 1);
    assert_eq!(stats.total_minutes, 80);
    assert_eq!(stats.completion_rate, 0);
}
