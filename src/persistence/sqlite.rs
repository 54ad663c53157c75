use super::{PersistenceError, PersistenceResult, PlanSnapshot, PlanStore};
use rusqlite::{Connection, OptionalExtension, params};
use std::sync::Mutex;
use tracing::info;

pub struct SqlitePlanStore {
    connection: Mutex<Connection>,
}

impl SqlitePlanStore {
    pub fn new<P: AsRef<std::path::Path>>(path: P) -> PersistenceResult<Self> {
        let connection = Connection::open(path)?;
        Self::initialize_schema(&connection)?;
        Ok(Self {
            connection: Mutex::new(connection),
        })
    }

    pub fn in_memory() -> PersistenceResult<Self> {
        let connection = Connection::open_in_memory()?;
        Self::initialize_schema(&connection)?;
        Ok(Self {
            connection: Mutex::new(connection),
        })
    }

    fn initialize_schema(connection: &Connection) -> PersistenceResult<()> {
        let ddl = r#"
            CREATE TABLE IF NOT EXISTS plans (
                user_key TEXT PRIMARY KEY,
                plan_json TEXT NOT NULL,
                updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
            );
        "#;
        connection.execute_batch(ddl)?;
        Ok(())
    }
}

impl PlanStore for SqlitePlanStore {
    async fn load(&self, user_key: &str) -> PersistenceResult<PlanSnapshot> {
        super::check_user_key(user_key)?;
        let json: Option<String> = {
            let conn = self.connection.lock().map_err(|_| PersistenceError::Poisoned)?;
            conn.query_row(
                "SELECT plan_json FROM plans WHERE user_key = ?1",
                params![user_key],
                |row| row.get(0),
            )
            .optional()?
        };

        let Some(json) = json else {
            return Ok(PlanSnapshot::default());
        };
        let snapshot: PlanSnapshot = serde_json::from_str(&json)?;
        super::validate_tasks(&snapshot.tasks)?;
        Ok(snapshot)
    }

    async fn save(&self, user_key: &str, snapshot: &PlanSnapshot) -> PersistenceResult<()> {
        super::check_user_key(user_key)?;
        super::validate_tasks(&snapshot.tasks)?;
        let json = serde_json::to_string(snapshot)?;

        let conn = self.connection.lock().map_err(|_| PersistenceError::Poisoned)?;
        conn.execute(
            "INSERT INTO plans (user_key, plan_json, updated_at) VALUES (?1, ?2, CURRENT_TIMESTAMP)
             ON CONFLICT(user_key) DO UPDATE SET plan_json = excluded.plan_json,
                                                 updated_at = excluded.updated_at",
            params![user_key, json],
        )?;
        info!(user = user_key, tasks = snapshot.tasks.len(), "saved plan to sqlite");
        Ok(())
    }
}
