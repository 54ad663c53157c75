use std::{collections::HashMap, net::SocketAddr, sync::Arc};

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, put},
};
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use crate::persistence::{self, Backend, PersistenceError, PlanSnapshot, PlanStore};
use crate::{
    BalanceReport, Day, DaySummary, Notifier, Placement, Planner, PlannerError, Statistics,
    StatusChange, Task, TaskId, TaskStatus, TracingNotifier,
};

/// Shared server state. Planners live behind one map lock that is never held
/// across a persistence call; writes for one user are serialized by that
/// user's writer lock, which is held from mutation through save.
#[derive(Clone)]
pub struct AppState {
    planners: Arc<RwLock<HashMap<String, Planner>>>,
    writers: Arc<Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>>,
    store: Arc<Backend>,
    notifier: Arc<dyn Notifier>,
}

impl AppState {
    pub fn new(store: Backend) -> Self {
        Self {
            planners: Arc::new(RwLock::new(HashMap::new())),
            writers: Arc::new(Mutex::new(HashMap::new())),
            store: Arc::new(store),
            notifier: Arc::new(TracingNotifier),
        }
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    async fn ensure_loaded(&self, user: &str) -> Result<(), ApiError> {
        persistence::check_user_key(user)?;
        let loaded = self.planners.read().contains_key(user);
        if loaded {
            return Ok(());
        }
        let store = self.store.load(user).await?.into_store()?;
        let mut planners = self.planners.write();
        planners.entry(user.to_string()).or_insert_with(|| {
            info!(user, tasks = store.len(), "loaded plan");
            Planner::new(store).with_notifier(self.notifier.clone())
        });
        Ok(())
    }

    async fn read<T>(&self, user: &str, f: impl FnOnce(&Planner) -> T) -> Result<T, ApiError> {
        self.ensure_loaded(user).await?;
        let planners = self.planners.read();
        let planner = planners
            .get(user)
            .ok_or_else(|| ApiError::internal("planner missing after load"))?;
        Ok(f(planner))
    }

    fn writer(&self, user: &str) -> Arc<tokio::sync::Mutex<()>> {
        self.writers
            .lock()
            .entry(user.to_string())
            .or_default()
            .clone()
    }

    /// Applies `f` under the map lock, then saves the resulting plan. The
    /// user's writer lock spans both steps, so saves land in mutation order.
    async fn mutate<T>(
        &self,
        user: &str,
        f: impl FnOnce(&mut Planner) -> Result<T, PlannerError>,
    ) -> Result<T, ApiError> {
        self.ensure_loaded(user).await?;
        let writer = self.writer(user);
        let _write_guard = writer.lock().await;
        let (value, snapshot) = {
            let mut planners = self.planners.write();
            let planner = planners
                .get_mut(user)
                .ok_or_else(|| ApiError::internal("planner missing after load"))?;
            let value = f(planner)?;
            (value, PlanSnapshot::from_store(planner.store()))
        };
        self.store.save(user, &snapshot).await?;
        Ok(value)
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    message: String,
}

#[derive(Debug)]
enum ApiError {
    NotFound(String),
    Conflict(String),
    Invalid(String),
    Internal(String),
}

impl ApiError {
    fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    fn internal(message: impl Into<String>) -> Self {
        ApiError::Internal(message.into())
    }
}

impl From<PlannerError> for ApiError {
    fn from(value: PlannerError) -> Self {
        match value {
            PlannerError::TaskNotFound(_) => ApiError::NotFound(value.to_string()),
            PlannerError::IllegalTransition(_) => ApiError::Conflict(value.to_string()),
            PlannerError::Validation(_)
            | PlannerError::Calendar(_)
            | PlannerError::UnknownStatus(_) => ApiError::Invalid(value.to_string()),
        }
    }
}

impl From<PersistenceError> for ApiError {
    fn from(value: PersistenceError) -> Self {
        match value {
            PersistenceError::InvalidUserKey(_) => ApiError::Invalid(value.to_string()),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, message) = match self {
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, "not_found", message),
            ApiError::Conflict(message) => (StatusCode::CONFLICT, "conflict", message),
            ApiError::Invalid(message) => (StatusCode::BAD_REQUEST, "invalid_request", message),
            ApiError::Internal(message) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", message)
            }
        };
        (status, Json(ErrorBody { error, message })).into_response()
    }
}

/// Duration as typed by a user (`"45"`) or as a JSON number.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum DurationInput {
    Minutes(i64),
    Text(String),
}

#[derive(Debug, Deserialize)]
struct CreateTaskPayload {
    title: String,
    duration: DurationInput,
    day: String,
    #[serde(default)]
    status: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StatusPayload {
    status: String,
}

#[derive(Debug, Deserialize)]
struct MovePayload {
    day: String,
}

#[derive(Debug, Deserialize)]
struct LimitPayload {
    daily_limit: i64,
}

#[derive(Debug, Serialize)]
struct DayView {
    day: Day,
    total_minutes: u32,
    daily_limit: u32,
    tasks: Vec<Task>,
}

#[derive(Debug, Serialize)]
struct LimitResponse {
    daily_limit: u32,
    reports: Vec<BalanceReport>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/users/:user/tasks", get(list_tasks).post(create_task))
        .route("/users/:user/tasks/:id", delete(delete_task))
        .route("/users/:user/tasks/:id/status", put(update_status))
        .route("/users/:user/tasks/:id/day", put(move_task))
        .route("/users/:user/days/:day", get(day_view))
        .route("/users/:user/summary", get(week_summary))
        .route("/users/:user/statistics", get(statistics))
        .route("/users/:user/limit", put(update_limit))
        .with_state(state)
}

pub async fn serve(addr: SocketAddr, state: AppState) -> std::io::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

async fn list_tasks(
    State(state): State<AppState>,
    Path(user): Path<String>,
) -> Result<Json<Vec<Task>>, ApiError> {
    let tasks = state
        .read(&user, |planner| planner.store().tasks().to_vec())
        .await?;
    Ok(Json(tasks))
}

async fn create_task(
    State(state): State<AppState>,
    Path(user): Path<String>,
    Json(payload): Json<CreateTaskPayload>,
) -> Result<(StatusCode, Json<Placement>), ApiError> {
    let placement = state
        .mutate(&user, |planner| {
            let day: Day = payload.day.trim().parse()?;
            let status = match payload.status.as_deref() {
                Some(raw) => raw.trim().parse::<TaskStatus>()?,
                None => TaskStatus::NotCompleted,
            };
            match payload.duration {
                DurationInput::Minutes(minutes) => {
                    planner.add_task_minutes(&payload.title, minutes, day, status)
                }
                DurationInput::Text(raw) => planner.add_task(&payload.title, &raw, day, status),
            }
        })
        .await?;
    Ok((StatusCode::CREATED, Json(placement)))
}

async fn delete_task(
    State(state): State<AppState>,
    Path((user, task_id)): Path<(String, String)>,
) -> Result<StatusCode, ApiError> {
    let id = TaskId::new(task_id);
    let removed = state
        .mutate(&user, |planner| Ok(planner.delete_task(&id)))
        .await?;
    if !removed {
        return Err(ApiError::not_found(format!("task {id} not found")));
    }
    Ok(StatusCode::NO_CONTENT)
}

async fn update_status(
    State(state): State<AppState>,
    Path((user, task_id)): Path<(String, String)>,
    Json(payload): Json<StatusPayload>,
) -> Result<Json<StatusChange>, ApiError> {
    let id = TaskId::new(task_id);
    let change = state
        .mutate(&user, |planner| {
            let status: TaskStatus = payload.status.trim().parse()?;
            planner.set_status(&id, status)
        })
        .await?;
    Ok(Json(change))
}

async fn move_task(
    State(state): State<AppState>,
    Path((user, task_id)): Path<(String, String)>,
    Json(payload): Json<MovePayload>,
) -> Result<Json<Placement>, ApiError> {
    let id = TaskId::new(task_id);
    let placement = state
        .mutate(&user, |planner| {
            let day: Day = payload.day.trim().parse()?;
            planner.move_task(&id, day)
        })
        .await?;
    Ok(Json(placement))
}

async fn day_view(
    State(state): State<AppState>,
    Path((user, day)): Path<(String, String)>,
) -> Result<Json<DayView>, ApiError> {
    let day: Day = day
        .trim()
        .parse()
        .map_err(|err| ApiError::from(PlannerError::from(err)))?;
    let view = state
        .read(&user, |planner| DayView {
            day,
            total_minutes: planner.day_total(day),
            daily_limit: planner.store().daily_limit(),
            tasks: planner.tasks_on_day(day).into_iter().cloned().collect(),
        })
        .await?;
    Ok(Json(view))
}

async fn week_summary(
    State(state): State<AppState>,
    Path(user): Path<String>,
) -> Result<Json<Vec<DaySummary>>, ApiError> {
    let summaries = state.read(&user, |planner| planner.day_summaries()).await?;
    Ok(Json(summaries))
}

async fn statistics(
    State(state): State<AppState>,
    Path(user): Path<String>,
) -> Result<Json<Statistics>, ApiError> {
    let stats = state.read(&user, |planner| planner.statistics()).await?;
    Ok(Json(stats))
}

async fn update_limit(
    State(state): State<AppState>,
    Path(user): Path<String>,
    Json(payload): Json<LimitPayload>,
) -> Result<Json<LimitResponse>, ApiError> {
    let response = state
        .mutate(&user, |planner| {
            let reports = planner.set_daily_limit(payload.daily_limit)?;
            Ok(LimitResponse {
                daily_limit: planner.store().daily_limit(),
                reports,
            })
        })
        .await?;
    Ok(Json(response))
}
