pub mod balance;
pub mod calendar;
pub mod config;
pub mod error;
#[cfg(feature = "http_api")]
pub mod http_api;
pub mod ids;
pub mod logging;
pub mod notify;
pub mod persistence;
pub mod planner;
pub mod report;
pub mod reschedule;
pub mod session;
pub mod statistics;
pub mod status;
pub mod store;
pub mod task;
pub mod validation;

pub use balance::{BalanceOutcome, BalanceReport, MAX_BALANCE_ATTEMPTS, Relocation};
pub use calendar::{CalendarError, Day, day_ahead, day_index, next_day};
pub use config::{PlannerConfig, StorageBackend, StorageConfig};
pub use error::{PlannerError, SessionError};
pub use ids::{Clock, FixedClock, IdGenerator, IdSource, SystemClock};
pub use notify::{Notice, NoticeLog, Notifier, Severity, TracingNotifier};
#[cfg(feature = "sqlite")]
pub use persistence::SqlitePlanStore;
pub use persistence::{
    Backend, JsonDirStore, MemoryPlanStore, PersistenceError, PlanSnapshot, PlanStore,
    export_tasks_to_csv, import_tasks_from_csv,
};
pub use planner::{Placement, Planner};
pub use reschedule::{RESCHEDULED_PREFIX, Reschedule};
pub use session::Session;
pub use statistics::{StatusCounts, Statistics};
pub use status::{IllegalTransition, StatusChange};
pub use store::{DEFAULT_DAILY_LIMIT, DaySummary, TaskStore};
pub use task::{Task, TaskId, TaskStatus};
pub use validation::{ValidationError, validate_duration, validate_title};
