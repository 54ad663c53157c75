use crate::task::TaskId;
use chrono::{DateTime, Utc};
use std::sync::Arc;

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock frozen at one instant, for reproducible ids and timestamps.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

pub trait IdSource: Send + Sync {
    fn next_id(&mut self) -> TaskId;
}

/// Task ids built from the clock's milliseconds and a counter that only ever
/// grows, so two ids minted in the same millisecond still differ.
pub struct IdGenerator {
    clock: Arc<dyn Clock>,
    counter: u64,
}

impl IdGenerator {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock, counter: 0 }
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock))
    }
}

impl IdSource for IdGenerator {
    fn next_id(&mut self) -> TaskId {
        self.counter += 1;
        let millis = self.clock.now().timestamp_millis();
        TaskId::new(format!("task-{millis:x}-{:x}", self.counter))
    }
}
