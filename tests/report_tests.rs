use study_planner::{Day, Planner, TaskStatus, TaskStore, report};

fn sample_planner() -> Planner {
    let mut planner = Planner::new(TaskStore::with_daily_limit(100));
    planner
        .add_task_minutes("Algebra", 60, Day::Monday, TaskStatus::NotCompleted)
        .unwrap();
    planner
        .add_task_minutes("Biology", 30, Day::Monday, TaskStatus::Completed)
        .unwrap();
    planner
        .add_task_minutes("Chemistry", 45, Day::Thursday, TaskStatus::Approaching)
        .unwrap();
    planner
}

#[test]
fn tasks_frame_has_one_row_per_task() {
    let planner = sample_planner();
    let df = report::tasks_frame(planner.store()).unwrap();
    assert_eq!(df.height(), 3);
    assert_eq!(
        df.get_column_names()
            .iter()
            .map(|n| n.as_str())
            .collect::<Vec<_>>(),
        vec!["id", "title", "day", "duration", "status"]
    );
}

#[test]
fn day_frame_filters_to_one_day() {
    let planner = sample_planner();
    let df = report::day_frame(planner.store(), Day::Monday).unwrap();
    assert_eq!(df.height(), 2);
    assert_eq!(df.width(), 4);

    let empty = report::day_frame(planner.store(), Day::Sunday).unwrap();
    assert_eq!(empty.height(), 0);
}

#[test]
fn weekly_frame_lists_all_days() {
    let planner = sample_planner();
    let df = report::weekly_load_frame(planner.store()).unwrap();
    assert_eq!(df.height(), 7);

    let totals: Vec<i64> = df
        .column("total_minutes")
        .unwrap()
        .i64()
        .unwrap()
        .into_no_null_iter()
        .collect();
    assert_eq!(totals, vec![90, 0, 0, 45, 0, 0, 0]);

    let remaining: Vec<i64> = df
        .column("remaining_minutes")
        .unwrap()
        .i64()
        .unwrap()
        .into_no_null_iter()
        .collect();
    assert_eq!(remaining, vec![10, 100, 100, 55, 100, 100, 100]);
}

#[test]
fn text_table_renders_headers_and_cells() {
    let planner = sample_planner();
    let df = report::day_frame(planner.store(), Day::Thursday).unwrap();
    let text = report::render_text_table(&df);
    assert!(text.contains("title"));
    assert!(text.contains("Chemistry"));
    assert!(text.contains("approaching"));
    assert!(!text.contains("Algebra"));
}
