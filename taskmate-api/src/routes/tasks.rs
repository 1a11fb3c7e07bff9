/// Task endpoints
///
/// CRUD plus sharing. All handlers sit behind the bearer-token middleware;
/// the caller's identity arrives explicitly via the `AuthUser` extension and
/// is passed into every ownership decision.
///
/// # Endpoints
///
/// - `GET /tasks` - Filtered, paginated list (owned ∪ shared)
/// - `POST /tasks` - Create (status always starts incomplete)
/// - `GET /tasks/:id` - Fetch one (owner or grant recipient)
/// - `PUT /tasks/:id` - Update (owner only)
/// - `POST /tasks/share` - Grant access by username
/// - `DELETE /tasks/:id` - Delete (owner only)

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    response::{success_data, success_message},
};
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Extension, Json,
};
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use taskmate_shared::{
    auth::middleware::AuthUser,
    models::{
        share_grant::ShareGrant,
        task::{
            CreateTask, PageMeta, Task, TaskCategory, TaskFilter, TaskPriority, TaskStatus,
            UpdateTask,
        },
        user::User,
    },
};
use uuid::Uuid;
use validator::Validate;

/// Query parameters for listing tasks
#[derive(Debug, Deserialize)]
pub struct TaskQuery {
    /// Restrict to tasks shared with the caller
    pub shared: Option<bool>,

    /// Filter by status
    pub status: Option<TaskStatus>,

    /// Filter by priority
    pub priority: Option<TaskPriority>,

    /// Filter by category
    pub category: Option<TaskCategory>,

    /// Lower bound on creation date (inclusive)
    pub from_date: Option<NaiveDate>,

    /// Upper bound on creation date (inclusive)
    pub to_date: Option<NaiveDate>,

    /// Page number, 1-based
    pub page: Option<i64>,

    /// Page size (values above the cap are clamped, not rejected)
    pub limit: Option<i64>,
}

/// Create-task request
///
/// Deliberately has no status field: any status sent by the client is
/// ignored and the task starts incomplete.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTaskRequest {
    /// Task title
    #[validate(length(min = 1, max = 255, message = "The title field is required."))]
    pub title: String,

    /// Category (defaults to general)
    pub category: Option<TaskCategory>,

    /// Priority (defaults to medium)
    pub priority: Option<TaskPriority>,

    /// Ordering hint
    pub sort_order: Option<i32>,
}

/// Update-task request
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateTaskRequest {
    /// New title
    #[validate(length(min = 1, max = 255, message = "The title field is required."))]
    pub title: Option<String>,

    /// New category
    pub category: Option<TaskCategory>,

    /// New priority
    pub priority: Option<TaskPriority>,

    /// New status
    pub status: Option<TaskStatus>,

    /// New ordering hint
    pub sort_order: Option<i32>,
}

/// Share-tasks request
///
/// `tasks` is kept as raw JSON so a non-array payload can produce the
/// documented validation error rather than a generic body-parse failure.
#[derive(Debug, Deserialize, Validate)]
pub struct ShareTasksRequest {
    /// Task ids to share
    pub tasks: Value,

    /// Recipient's username
    #[validate(length(min = 1, max = 50, message = "The username field is required."))]
    pub username: String,
}

/// Task owner view embedded in task resources
#[derive(Debug, Serialize)]
pub struct TaskOwner {
    /// Display name
    pub name: String,

    /// Unique handle
    pub username: String,
}

/// Task as returned to clients
#[derive(Debug, Serialize)]
pub struct TaskResource {
    pub id: Uuid,
    pub title: String,
    pub category: TaskCategory,
    pub priority: TaskPriority,
    pub status: TaskStatus,
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    /// Whether the viewer may delete this task (owner only)
    pub can_delete: bool,

    /// Whether the viewer may share this task (owner only)
    pub can_share: bool,

    /// Owner's public view
    pub user: Option<TaskOwner>,
}

impl TaskResource {
    fn new(task: Task, viewer_id: Uuid, owner: Option<&User>) -> Self {
        let is_owner = task.user_id == viewer_id;

        Self {
            id: task.id,
            title: task.title,
            category: task.category,
            priority: task.priority,
            status: task.status,
            sort_order: task.sort_order,
            created_at: task.created_at,
            updated_at: task.updated_at,
            can_delete: is_owner,
            can_share: is_owner,
            user: owner.map(|user| TaskOwner {
                name: user.name.clone(),
                username: user.username.clone(),
            }),
        }
    }
}

/// First instant of a date, UTC
fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

/// Last whole second of a date, UTC, so the upper bound stays inclusive
fn end_of_day(date: NaiveDate) -> DateTime<Utc> {
    start_of_day(date) + Duration::days(1) - Duration::seconds(1)
}

/// Extracts task ids from the raw `tasks` payload
///
/// Null and empty-string entries are skipped (best-effort contract); a
/// non-array payload or a malformed id is a validation error.
fn parse_task_ids(value: &Value) -> Result<Vec<Uuid>, ApiError> {
    let entries = value
        .as_array()
        .ok_or_else(|| ApiError::field_error("tasks", "Tasks should be an array."))?;

    let mut task_ids = Vec::new();
    for entry in entries {
        match entry {
            Value::Null => continue,
            Value::String(s) if s.is_empty() => continue,
            Value::String(s) => {
                let id = Uuid::parse_str(s).map_err(|_| {
                    ApiError::field_error("tasks", "Tasks should be a list of task ids.")
                })?;
                task_ids.push(id);
            }
            _ => {
                return Err(ApiError::field_error(
                    "tasks",
                    "Tasks should be a list of task ids.",
                ))
            }
        }
    }

    Ok(task_ids)
}

/// Loads the owners for a page of tasks in one query
async fn load_owners(
    state: &AppState,
    tasks: &[Task],
) -> Result<HashMap<Uuid, User>, ApiError> {
    let mut owner_ids: Vec<Uuid> = tasks.iter().map(|task| task.user_id).collect();
    owner_ids.sort_unstable();
    owner_ids.dedup();

    let owners = User::find_by_ids(&state.db, &owner_ids).await?;
    Ok(owners.into_iter().map(|user| (user.id, user)).collect())
}

/// List tasks visible to the caller
///
/// `shared=true` restricts to tasks granted to the caller; otherwise the
/// base set is owned ∪ shared. Filters are conjunctions, newest first,
/// page size capped at 20.
pub async fn list_tasks(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Query(query): Query<TaskQuery>,
) -> ApiResult<impl IntoResponse> {
    if let (Some(from), Some(to)) = (query.from_date, query.to_date) {
        if to < from {
            return Err(ApiError::field_error(
                "to_date",
                "The end date must be after or equal to the start date.",
            ));
        }
    }

    let filter = TaskFilter {
        shared: query.shared.unwrap_or(false),
        status: query.status,
        priority: query.priority,
        category: query.category,
        from_date: query.from_date.map(start_of_day),
        to_date: query.to_date.map(end_of_day),
        page: query.page,
        limit: query.limit,
    };

    let (tasks, total) = Task::list_for_viewer(&state.db, auth.id, &filter).await?;
    let meta = PageMeta::new(filter.page(), filter.per_page(), total);

    let owners = load_owners(&state, &tasks).await?;
    let resources: Vec<TaskResource> = tasks
        .into_iter()
        .map(|task| {
            let owner = owners.get(&task.user_id);
            TaskResource::new(task, auth.id, owner)
        })
        .collect();

    Ok(success_data(
        "Task fetched",
        serde_json::json!({
            "tasks": resources,
            "meta": meta,
        }),
    ))
}

/// Create a task owned by the caller
pub async fn create_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(req): Json<CreateTaskRequest>,
) -> ApiResult<impl IntoResponse> {
    req.validate()?;

    let task = Task::create(
        &state.db,
        CreateTask {
            user_id: auth.id,
            title: req.title,
            category: req.category.unwrap_or(TaskCategory::General),
            priority: req.priority.unwrap_or(TaskPriority::Medium),
            sort_order: req.sort_order.unwrap_or(0),
        },
    )
    .await?;

    let owner = User::find_by_id(&state.db, auth.id).await?;
    let resource = TaskResource::new(task, auth.id, owner.as_ref());

    Ok(success_data("task created", resource))
}

/// Fetch a single task
///
/// Visible to the owner and to grant recipients; everyone else gets a 404
/// rather than confirmation that the task exists.
pub async fn show_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(task_id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let task = Task::find_by_id(&state.db, task_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found.".to_string()))?;

    if task.user_id != auth.id && !ShareGrant::exists(&state.db, task.id, auth.id).await? {
        return Err(ApiError::NotFound("Task not found.".to_string()));
    }

    let owner = User::find_by_id(&state.db, task.user_id).await?;
    let resource = TaskResource::new(task, auth.id, owner.as_ref());

    Ok(success_data("task", resource))
}

/// Update a task (owner only)
///
/// The owning user never changes; any other field may.
pub async fn update_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(task_id): Path<Uuid>,
    Json(req): Json<UpdateTaskRequest>,
) -> ApiResult<impl IntoResponse> {
    req.validate()?;

    let task = Task::find_by_id(&state.db, task_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found.".to_string()))?;

    if task.user_id != auth.id {
        return Err(ApiError::Forbidden(
            "You are not authorized to update this task.".to_string(),
        ));
    }

    let updated = Task::update(
        &state.db,
        task.id,
        UpdateTask {
            title: req.title,
            category: req.category,
            priority: req.priority,
            status: req.status,
            sort_order: req.sort_order,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("Task not found.".to_string()))?;

    let owner = User::find_by_id(&state.db, updated.user_id).await?;
    let resource = TaskResource::new(updated, auth.id, owner.as_ref());

    Ok(success_data("task updated", resource))
}

/// Share tasks with another user by username
///
/// Grants are created per id with no surrounding transaction: a failure on
/// one id leaves grants already created in place. Re-sharing an already
/// shared task is a no-op.
pub async fn share_tasks(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(req): Json<ShareTasksRequest>,
) -> ApiResult<impl IntoResponse> {
    req.validate()?;

    let task_ids = parse_task_ids(&req.tasks)?;

    let recipient = User::find_by_username(&state.db, &req.username)
        .await?
        .ok_or_else(|| ApiError::NotFound("Username not found".to_string()))?;

    if recipient.id == auth.id {
        return Err(ApiError::BadRequest(
            "You cannot share your task with yourself.".to_string(),
        ));
    }

    for task_id in task_ids {
        ShareGrant::grant(&state.db, task_id, recipient.id, auth.id).await?;
    }

    Ok(success_message("Task shared successfully"))
}

/// Delete a task (owner only)
pub async fn delete_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(task_id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let task = Task::find_by_id(&state.db, task_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found.".to_string()))?;

    if task.user_id != auth.id {
        return Err(ApiError::Forbidden(
            "You are not authorized to delete this task.".to_string(),
        ));
    }

    Task::delete(&state.db, task.id).await?;

    Ok(success_message("task deleted"))
}
