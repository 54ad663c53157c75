use crate::calendar::Day;
use crate::store::TaskStore;
use polars::prelude::*;

/// One row per task, in store order.
pub fn tasks_frame(store: &TaskStore) -> PolarsResult<DataFrame> {
    let tasks = store.tasks();
    let ids: Vec<&str> = tasks.iter().map(|task| task.id.as_str()).collect();
    let titles: Vec<&str> = tasks.iter().map(|task| task.title.as_str()).collect();
    let days: Vec<&str> = tasks.iter().map(|task| task.day.as_str()).collect();
    let durations: Vec<i64> = tasks.iter().map(|task| i64::from(task.duration)).collect();
    let statuses: Vec<&str> = tasks.iter().map(|task| task.status.as_str()).collect();

    DataFrame::new(vec![
        Series::new(PlSmallStr::from_static("id"), ids).into_column(),
        Series::new(PlSmallStr::from_static("title"), titles).into_column(),
        Series::new(PlSmallStr::from_static("day"), days).into_column(),
        Series::new(PlSmallStr::from_static("duration"), durations).into_column(),
        Series::new(PlSmallStr::from_static("status"), statuses).into_column(),
    ])
}

pub fn day_frame(store: &TaskStore, day: Day) -> PolarsResult<DataFrame> {
    tasks_frame(store)?
        .lazy()
        .filter(col("day").eq(lit(day.as_str())))
        .select([col("id"), col("title"), col("duration"), col("status")])
        .collect()
}

/// Seven rows, Monday first, with each day's load against the limit.
pub fn weekly_load_frame(store: &TaskStore) -> PolarsResult<DataFrame> {
    let summaries = store.day_summaries();
    let days: Vec<&str> = summaries.iter().map(|s| s.day.as_str()).collect();
    let counts: Vec<i64> = summaries.iter().map(|s| s.task_count as i64).collect();
    let totals: Vec<i64> = summaries.iter().map(|s| i64::from(s.total_minutes)).collect();
    let remaining: Vec<i64> = summaries
        .iter()
        .map(|s| i64::from(s.remaining_minutes))
        .collect();
    let over: Vec<bool> = summaries.iter().map(|s| s.over_limit).collect();

    DataFrame::new(vec![
        Series::new(PlSmallStr::from_static("day"), days).into_column(),
        Series::new(PlSmallStr::from_static("tasks"), counts).into_column(),
        Series::new(PlSmallStr::from_static("total_minutes"), totals).into_column(),
        Series::new(PlSmallStr::from_static("remaining_minutes"), remaining).into_column(),
        Series::new(PlSmallStr::from_static("over_limit"), over).into_column(),
    ])
}

fn cell_text(value: &AnyValue) -> String {
    match value {
        AnyValue::Null => String::new(),
        AnyValue::String(s) => s.to_string(),
        AnyValue::StringOwned(s) => s.to_string(),
        other => other.to_string(),
    }
}

/// Renders a frame as a boxed plain-text table.
pub fn render_text_table(df: &DataFrame) -> String {
    let columns = df.get_columns();
    let names: Vec<String> = columns.iter().map(|c| c.name().to_string()).collect();

    let mut rows: Vec<Vec<String>> = Vec::with_capacity(df.height());
    for row_idx in 0..df.height() {
        let row = columns
            .iter()
            .map(|col| col.get(row_idx).map(|av| cell_text(&av)).unwrap_or_default())
            .collect();
        rows.push(row);
    }

    let mut widths: Vec<usize> = names.iter().map(|n| n.chars().count()).collect();
    for row in &rows {
        for (ci, cell) in row.iter().enumerate() {
            widths[ci] = widths[ci].max(cell.chars().count());
        }
    }

    let mut sep = String::from("+");
    for w in &widths {
        sep.push_str(&"-".repeat(*w + 2));
        sep.push('+');
    }

    let render_row = |cells: &[String]| {
        let mut line = String::from("|");
        for (ci, cell) in cells.iter().enumerate() {
            let pad = widths[ci].saturating_sub(cell.chars().count());
            line.push(' ');
            line.push_str(cell);
            line.push_str(&" ".repeat(pad));
            line.push_str(" |");
        }
        line
    };

    let mut out = String::new();
    out.push_str(&sep);
    out.push('\n');
    out.push_str(&render_row(&names));
    out.push('\n');
    out.push_str(&sep);
    out.push('\n');
    for row in &rows {
        out.push_str(&render_row(row));
        out.push('\n');
    }
    out.push_str(&sep);
    out.push('\n');
    out
}
