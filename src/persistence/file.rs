use super::{PersistenceError, PersistenceResult, PlanSnapshot, PlanStore};
use crate::calendar::Day;
use crate::task::{Task, TaskId, TaskStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::info;

/// One pretty-printed JSON document per user, named `<user_key>.json`.
#[derive(Debug, Clone)]
pub struct JsonDirStore {
    dir: PathBuf,
}

impl JsonDirStore {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn path_for(&self, user_key: &str) -> PersistenceResult<PathBuf> {
        super::check_user_key(user_key)?;
        Ok(self.dir.join(format!("{user_key}.json")))
    }
}

impl PlanStore for JsonDirStore {
    async fn load(&self, user_key: &str) -> PersistenceResult<PlanSnapshot> {
        let path = self.path_for(user_key)?;
        let file = match File::open(&path) {
            Ok(file) => file,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(PlanSnapshot::default()),
            Err(err) => return Err(err.into()),
        };
        let snapshot: PlanSnapshot = serde_json::from_reader(file)?;
        super::validate_tasks(&snapshot.tasks)?;
        Ok(snapshot)
    }

    async fn save(&self, user_key: &str, snapshot: &PlanSnapshot) -> PersistenceResult<()> {
        let path = self.path_for(user_key)?;
        super::validate_tasks(&snapshot.tasks)?;
        fs::create_dir_all(&self.dir)?;
        // Write aside and rename so readers never see a partial document.
        let staging = self.dir.join(format!(".{user_key}.json.tmp"));
        let file = File::create(&staging)?;
        serde_json::to_writer_pretty(&file, snapshot)?;
        file.sync_all()?;
        fs::rename(&staging, &path)?;
        info!(user = user_key, path = %path.display(), tasks = snapshot.tasks.len(), "saved plan");
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct TaskCsvRecord {
    id: String,
    title: String,
    duration: u32,
    day: Day,
    status: TaskStatus,
    created_at: String,
}

impl From<&Task> for TaskCsvRecord {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id.to_string(),
            title: task.title.clone(),
            duration: task.duration,
            day: task.day,
            status: task.status,
            created_at: task.created_at.to_rfc3339(),
        }
    }
}

impl TryFrom<TaskCsvRecord> for Task {
    type Error = PersistenceError;

    fn try_from(record: TaskCsvRecord) -> Result<Self, Self::Error> {
        let created_at = DateTime::parse_from_rfc3339(&record.created_at)
            .map_err(|err| {
                PersistenceError::InvalidData(format!(
                    "task {} has invalid created_at '{}': {err}",
                    record.id, record.created_at
                ))
            })?
            .with_timezone(&Utc);
        Ok(Task::new(
            TaskId::new(record.id),
            record.title,
            record.duration,
            record.day,
            record.status,
            created_at,
        ))
    }
}

pub fn export_tasks_to_csv<P: AsRef<Path>>(tasks: &[Task], path: P) -> PersistenceResult<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for task in tasks {
        writer.serialize(TaskCsvRecord::from(task))?;
    }
    writer.flush()?;
    Ok(())
}

pub fn import_tasks_from_csv<P: AsRef<Path>>(path: P) -> PersistenceResult<Vec<Task>> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut tasks = Vec::new();
    for record in reader.deserialize::<TaskCsvRecord>() {
        let mut task = Task::try_from(record?)?;
        task.title = super::normalize_title(&task.title).map_err(|err| {
            PersistenceError::InvalidData(format!("task {}: {err}", task.id))
        })?;
        tasks.push(task);
    }
    super::validate_tasks(&tasks)?;
    Ok(tasks)
}
