use std::io::{self, BufRead, Write};
use std::path::Path;
use std::sync::Arc;

use study_planner::config::{CONFIG_FILE_NAME, PlannerConfig};
use study_planner::{
    Backend, BalanceReport, Day, NoticeLog, Placement, Planner, Session, SessionError, TaskId,
    TaskStatus, export_tasks_to_csv, import_tasks_from_csv, logging, report,
};

fn print_help() {
    println!(
        "Commands:\n  help                               Show this help\n  show                               Show weekly load and all tasks\n  day <day>                          Show tasks on one day\n  add <day> <minutes> <title...>     Add a not-completed task\n  edit <id> <minutes> <title...>     Change a task's title and duration\n  status <id> <status>               Set status (completed|not-completed|approaching|missed)\n  move <id> <day>                    Move a task to another day\n  delete <id>                        Delete a task\n  limit <minutes>                    Set the daily limit\n  select <day>                       Focus a day\n  stats                              Show statistics\n  export <csv_path>                  Write all tasks to CSV\n  import <csv_path>                  Replace all tasks from CSV\n  reset                              Remove all tasks\n  quit|exit                          Exit"
    );
}

fn print_week(planner: &Planner) {
    println!(
        "Daily limit: {} minutes",
        planner.store().daily_limit()
    );
    match report::weekly_load_frame(planner.store()) {
        Ok(df) => print!("{}", report::render_text_table(&df)),
        Err(e) => println!("Error rendering week: {}", e),
    }
    match report::tasks_frame(planner.store()) {
        Ok(df) => print!("{}", report::render_text_table(&df)),
        Err(e) => println!("Error rendering tasks: {}", e),
    }
}

fn print_day(planner: &Planner, day: Day) {
    println!(
        "{}: {}/{} minutes",
        day,
        planner.day_total(day),
        planner.store().daily_limit()
    );
    match report::day_frame(planner.store(), day) {
        Ok(df) => print!("{}", report::render_text_table(&df)),
        Err(e) => println!("Error rendering day: {}", e),
    }
}

fn print_balance(report: &BalanceReport) {
    for relocation in &report.relocations {
        println!(
            "Moved task {} ({} min) from {} to {}.",
            relocation.task_id, relocation.duration, relocation.from, relocation.to
        );
    }
}

fn print_placement(placement: &Placement) {
    println!(
        "Task {} '{}' on {} ({} min).",
        placement.task.id, placement.task.title, placement.task.day, placement.task.duration
    );
    print_balance(&placement.balance);
}

fn print_notices(log: &NoticeLog) {
    for notice in log.drain() {
        println!("[{}] {}", notice.severity, notice.message);
    }
}

fn print_error(err: &SessionError) {
    println!("Error: {}", err);
}

fn parse_day(raw: Option<&str>, usage: &str) -> Option<Day> {
    match raw.map(str::parse::<Day>) {
        Some(Ok(day)) => Some(day),
        Some(Err(e)) => {
            println!("{}", e);
            None
        }
        None => {
            println!("Usage: {}", usage);
            None
        }
    }
}

fn rest_of_line<'a>(parts: impl Iterator<Item = &'a str>) -> String {
    parts.collect::<Vec<_>>().join(" ")
}

#[tokio::main]
async fn main() {
    let mut config = match PlannerConfig::load(Path::new(CONFIG_FILE_NAME)) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            PlannerConfig::default()
        }
    };
    config.apply_env();
    logging::init_tracing(&config.log.filter);

    let backend = match Backend::open(&config.storage) {
        Ok(backend) => backend,
        Err(e) => {
            eprintln!("Cannot open storage: {}", e);
            std::process::exit(1);
        }
    };
    let notices = Arc::new(NoticeLog::new());
    let planner = Planner::default().with_notifier(notices.clone());
    let mut session = match Session::open(config.user.clone(), backend, planner).await {
        Ok(session) => session,
        Err(e) => {
            eprintln!("Cannot load plan for '{}': {}", config.user, e);
            std::process::exit(1);
        }
    };

    println!("Study Planner (CLI) - type 'help' for commands\n");
    print_week(session.planner());

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("> ");
        let _ = io::stdout().flush();
        line.clear();
        match stdin.lock().read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        let mut parts = input.split_whitespace();
        let cmd = parts.next().unwrap_or("");

        match cmd {
            "help" => print_help(),
            "quit" | "exit" => break,
            "show" => print_week(session.planner()),
            "day" => {
                if let Some(day) = parse_day(parts.next(), "day <day>") {
                    print_day(session.planner(), day);
                }
            }
            "add" => {
                let Some(day) = parse_day(parts.next(), "add <day> <minutes> <title...>") else {
                    continue;
                };
                let Some(minutes) = parts.next() else {
                    println!("Usage: add <day> <minutes> <title...>");
                    continue;
                };
                let title = rest_of_line(parts);
                match session
                    .add_task(&title, minutes, day, TaskStatus::NotCompleted)
                    .await
                {
                    Ok(placement) => print_placement(&placement),
                    Err(e) => print_error(&e),
                }
            }
            "edit" => {
                let (Some(id), Some(minutes)) = (parts.next(), parts.next()) else {
                    println!("Usage: edit <id> <minutes> <title...>");
                    continue;
                };
                let title = rest_of_line(parts);
                match session.edit_task(&TaskId::new(id), &title, minutes).await {
                    Ok(placement) => print_placement(&placement),
                    Err(e) => print_error(&e),
                }
            }
            "status" => {
                let (Some(id), Some(status)) = (parts.next(), parts.next()) else {
                    println!("Usage: status <id> <status>");
                    continue;
                };
                let status = match status.parse::<TaskStatus>() {
                    Ok(status) => status,
                    Err(e) => {
                        println!("{}", e);
                        continue;
                    }
                };
                match session.set_status(&TaskId::new(id), status).await {
                    Ok(change) => {
                        println!(
                            "Task {} status {} -> {}.",
                            change.task.id, change.previous, change.task.status
                        );
                        if let Some(rescheduled) = &change.rescheduled {
                            println!(
                                "Rescheduled as {} on {}.",
                                rescheduled.task.id, rescheduled.target
                            );
                            print_balance(&rescheduled.balance);
                        }
                    }
                    Err(e) => print_error(&e),
                }
            }
            "move" => {
                let Some(id) = parts.next() else {
                    println!("Usage: move <id> <day>");
                    continue;
                };
                let Some(day) = parse_day(parts.next(), "move <id> <day>") else {
                    continue;
                };
                match session.move_task(&TaskId::new(id), day).await {
                    Ok(placement) => print_placement(&placement),
                    Err(e) => print_error(&e),
                }
            }
            "delete" => match parts.next() {
                Some(id) => match session.delete_task(&TaskId::new(id)).await {
                    Ok(true) => println!("Deleted task {}.", id),
                    Ok(false) => println!("Task {} not found.", id),
                    Err(e) => print_error(&e),
                },
                None => println!("Usage: delete <id>"),
            },
            "limit" => {
                let minutes = match parts.next().map(str::parse::<i64>) {
                    Some(Ok(minutes)) => minutes,
                    _ => {
                        println!("Usage: limit <minutes>");
                        continue;
                    }
                };
                match session.set_daily_limit(minutes).await {
                    Ok(reports) => {
                        println!("Daily limit set to {} minutes.", minutes);
                        reports.iter().for_each(print_balance);
                    }
                    Err(e) => print_error(&e),
                }
            }
            "select" => {
                if let Some(day) = parse_day(parts.next(), "select <day>") {
                    session.select_day(Some(day));
                    print_day(session.planner(), day);
                }
            }
            "stats" => {
                let stats = session.planner().statistics();
                println!("Total tasks      : {}", stats.total);
                println!("Completed        : {}", stats.counts.completed);
                println!("Not completed    : {}", stats.counts.not_completed);
                println!("Approaching      : {}", stats.counts.approaching);
                println!("Missed           : {}", stats.counts.missed);
                println!("Total minutes    : {}", stats.total_minutes);
                println!("Average duration : {}", stats.average_duration);
                println!("Completion rate  : {}%", stats.completion_rate);
            }
            "export" => match parts.next() {
                Some(path) => match export_tasks_to_csv(session.planner().store().tasks(), path) {
                    Ok(()) => println!("Tasks exported to {}.", path),
                    Err(e) => println!("Export error: {}", e),
                },
                None => println!("Usage: export <csv_path>"),
            },
            "import" => match parts.next() {
                Some(path) => match import_tasks_from_csv(path) {
                    Ok(tasks) => {
                        let count = tasks.len();
                        match session.replace_tasks(tasks).await {
                            Ok(()) => println!("Imported {} tasks from {}.", count, path),
                            Err(e) => print_error(&e),
                        }
                    }
                    Err(e) => println!("Import error: {}", e),
                },
                None => println!("Usage: import <csv_path>"),
            },
            "reset" => match session.reset().await {
                Ok(()) => println!("All tasks removed."),
                Err(e) => print_error(&e),
            },
            other => println!("Unknown command '{}'. Type 'help'.", other),
        }
        print_notices(&notices);
    }
}
