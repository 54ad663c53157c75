use super::{PersistenceError, PersistenceResult, PlanSnapshot, PlanStore};
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Debug, Default)]
pub struct MemoryPlanStore {
    plans: Mutex<HashMap<String, PlanSnapshot>>,
}

impl MemoryPlanStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PlanStore for MemoryPlanStore {
    async fn load(&self, user_key: &str) -> PersistenceResult<PlanSnapshot> {
        super::check_user_key(user_key)?;
        let plans = self.plans.lock().map_err(|_| PersistenceError::Poisoned)?;
        Ok(plans.get(user_key).cloned().unwrap_or_default())
    }

    async fn save(&self, user_key: &str, snapshot: &PlanSnapshot) -> PersistenceResult<()> {
        super::check_user_key(user_key)?;
        super::validate_tasks(&snapshot.tasks)?;
        let mut plans = self.plans.lock().map_err(|_| PersistenceError::Poisoned)?;
        plans.insert(user_key.to_string(), snapshot.clone());
        Ok(())
    }
}
