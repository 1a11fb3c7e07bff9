/// Task model and database operations
///
/// Tasks are owned by a single user and may additionally be visible to other
/// users through share grants (`share_grant` module). Listing combines both
/// sources and applies filters as pure conjunctions.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE tasks (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     title VARCHAR(255) NOT NULL,
///     category task_category NOT NULL DEFAULT 'general',
///     priority task_priority NOT NULL DEFAULT 'medium',
///     status task_status NOT NULL DEFAULT 'incomplete',
///     sort_order INTEGER NOT NULL DEFAULT 0,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

const TASK_COLUMNS: &str =
    "id, user_id, title, category, priority, status, sort_order, created_at, updated_at";

/// Hard cap on page size, applied silently regardless of the requested value
pub const MAX_PAGE_SIZE: i64 = 20;

/// Page size used when the client does not request one
pub const DEFAULT_PAGE_SIZE: i64 = 20;

/// Task category
///
/// Corresponds to the `task_category` SQL enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_category", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TaskCategory {
    Frontend,
    Backend,
    Documentation,
    Database,
    Testing,
    Deployment,
    General,
}

/// Task priority
///
/// Corresponds to the `task_priority` SQL enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_priority", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    Low,
    Medium,
    High,
}

/// Task completion status
///
/// Corresponds to the `task_status` SQL enum. New tasks always start as
/// `incomplete` no matter what the client sends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Incomplete,
    Complete,
}

/// Task model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    /// Unique task ID (UUID v4)
    pub id: Uuid,

    /// Owning user; immutable after creation
    pub user_id: Uuid,

    /// Task title
    pub title: String,

    /// Category
    pub category: TaskCategory,

    /// Priority
    pub priority: TaskPriority,

    /// Completion status
    pub status: TaskStatus,

    /// Client-controlled ordering hint
    pub sort_order: i32,

    /// When the task was created
    pub created_at: DateTime<Utc>,

    /// When the task was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new task
///
/// Carries no status on purpose: creation always starts at `incomplete`.
#[derive(Debug, Clone)]
pub struct CreateTask {
    /// Owning user
    pub user_id: Uuid,

    /// Task title
    pub title: String,

    /// Category
    pub category: TaskCategory,

    /// Priority
    pub priority: TaskPriority,

    /// Ordering hint (defaults to 0)
    pub sort_order: i32,
}

/// Input for updating an existing task
///
/// All fields are optional; only non-None fields are written. The owning
/// user cannot be changed through updates.
#[derive(Debug, Clone, Default)]
pub struct UpdateTask {
    /// New title
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

/// Filters for listing tasks
///
/// All present filters are AND-ed over the base set. The base set is either
/// the tasks shared with the viewer (`shared = true`) or the union of owned
/// and shared tasks.
#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    /// Restrict to tasks shared with the viewer
    pub shared: bool,

    /// Filter by status
    pub status: Option<TaskStatus>,

    /// Filter by priority
    pub priority: Option<TaskPriority>,

    /// Filter by category
    pub category: Option<TaskCategory>,

    /// Lower bound (inclusive) on creation time
    pub from_date: Option<DateTime<Utc>>,

    /// Upper bound (inclusive) on creation time
    pub to_date: Option<DateTime<Utc>>,

    /// Requested page, 1-based
    pub page: Option<i64>,

    /// Requested page size (clamped, never rejected)
    pub limit: Option<i64>,
}

impl TaskFilter {
    /// Effective page size: requested value clamped to [1, MAX_PAGE_SIZE]
    pub fn per_page(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE)
    }

    /// Effective page number, 1-based
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1).max(1)
    }

    /// Row offset for the effective page
    pub fn offset(&self) -> i64 {
        (self.page() - 1) * self.per_page()
    }
}

/// Pagination metadata returned alongside a page of tasks
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageMeta {
    /// Page that was returned, 1-based
    pub current_page: i64,

    /// Effective page size
    pub per_page: i64,

    /// Total rows matching the filters
    pub total: i64,

    /// Last page number (at least 1)
    pub last_page: i64,
}

impl PageMeta {
    /// Computes metadata for a page
    pub fn new(current_page: i64, per_page: i64, total: i64) -> Self {
        let last_page = if total == 0 {
            1
        } else {
            (total + per_page - 1) / per_page
        };

        Self {
            current_page,
            per_page,
            total,
            last_page,
        }
    }
}

impl Task {
    /// Creates a new task for its owner
    ///
    /// Status is not part of the input; the row starts as `incomplete`.
    pub async fn create(pool: &PgPool, data: CreateTask) -> Result<Self, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(&format!(
            r#"
            INSERT INTO tasks (user_id, title, category, priority, sort_order)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {TASK_COLUMNS}
            "#,
        ))
        .bind(data.user_id)
        .bind(data.title)
        .bind(data.category)
        .bind(data.priority)
        .bind(data.sort_order)
        .fetch_one(pool)
        .await?;

        Ok(task)
    }

    /// Finds a task by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Task>(&format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = $1"))
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Updates an existing task
    ///
    /// Only non-None fields in `data` are written; `updated_at` is always
    /// refreshed. Returns the updated task, or None if the id is unknown.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateTask,
    ) -> Result<Option<Self>, sqlx::Error> {
        // Build the SET clause from the fields that are present.
        let mut query = String::from("UPDATE tasks SET updated_at = NOW()");
        let mut bind_count = 1;

        if data.title.is_some() {
            bind_count += 1;
            query.push_str(&format!(", title = ${bind_count}"));
        }
        if data.category.is_some() {
            bind_count += 1;
            query.push_str(&format!(", category = ${bind_count}"));
        }
        if data.priority.is_some() {
            bind_count += 1;
            query.push_str(&format!(", priority = ${bind_count}"));
        }
        if data.status.is_some() {
            bind_count += 1;
            query.push_str(&format!(", status = ${bind_count}"));
        }
        if data.sort_order.is_some() {
            bind_count += 1;
            query.push_str(&format!(", sort_order = ${bind_count}"));
        }

        query.push_str(&format!(" WHERE id = $1 RETURNING {TASK_COLUMNS}"));

        let mut q = sqlx::query_as::<_, Task>(&query).bind(id);

        if let Some(title) = data.title {
            q = q.bind(title);
        }
        if let Some(category) = data.category {
            q = q.bind(category);
        }
        if let Some(priority) = data.priority {
            q = q.bind(priority);
        }
        if let Some(status) = data.status {
            q = q.bind(status);
        }
        if let Some(sort_order) = data.sort_order {
            q = q.bind(sort_order);
        }

        q.fetch_optional(pool).await
    }

    /// Deletes a task by ID
    ///
    /// Share grants referencing the task disappear via the cascade.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Lists tasks visible to a viewer, filtered and paginated
    ///
    /// Returns the page of tasks (newest first) together with the total count
    /// matching the filters, so callers can build pagination metadata.
    pub async fn list_for_viewer(
        pool: &PgPool,
        viewer_id: Uuid,
        filter: &TaskFilter,
    ) -> Result<(Vec<Self>, i64), sqlx::Error> {
        // $1 is always the viewer; filter parameters follow in declaration order.
        let base = if filter.shared {
            "id IN (SELECT task_id FROM shared_tasks WHERE shared_with = $1)"
        } else {
            "(user_id = $1 OR id IN (SELECT task_id FROM shared_tasks WHERE shared_with = $1))"
        };

        let mut conditions = vec![base.to_string()];
        let mut param = 2;

        if filter.status.is_some() {
            conditions.push(format!("status = ${param}"));
            param += 1;
        }
        if filter.priority.is_some() {
            conditions.push(format!("priority = ${param}"));
            param += 1;
        }
        if filter.category.is_some() {
            conditions.push(format!("category = ${param}"));
            param += 1;
        }
        if filter.from_date.is_some() {
            conditions.push(format!("created_at >= ${param}"));
            param += 1;
        }
        if filter.to_date.is_some() {
            conditions.push(format!("created_at <= ${param}"));
            param += 1;
        }

        let where_clause = conditions.join(" AND ");
        let select_sql = format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE {where_clause} \
             ORDER BY created_at DESC LIMIT ${param} OFFSET ${}",
            param + 1
        );
        let count_sql = format!("SELECT COUNT(*) FROM tasks WHERE {where_clause}");

        let mut select = sqlx::query_as::<_, Task>(&select_sql).bind(viewer_id);
        let mut count = sqlx::query_as::<_, (i64,)>(&count_sql).bind(viewer_id);

        if let Some(status) = filter.status {
            select = select.bind(status);
            count = count.bind(status);
        }
        if let Some(priority) = filter.priority {
            select = select.bind(priority);
            count = count.bind(priority);
        }
        if let Some(category) = filter.category {
            select = select.bind(category);
            count = count.bind(category);
        }
        if let Some(from_date) = filter.from_date {
            select = select.bind(from_date);
            count = count.bind(from_date);
        }
        if let Some(to_date) = filter.to_date {
            select = select.bind(to_date);
            count = count.bind(to_date);
        }

        let tasks = select
            .bind(filter.per_page())
            .bind(filter.offset())
            .fetch_all(pool)
            .await?;
        let (total,) = count.fetch_one(pool).await?;

        Ok((tasks, total))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_per_page_clamped_to_cap() {
        let filter = TaskFilter {
            limit: Some(500),
            ..Default::default()
        };
        assert_eq!(filter.per_page(), MAX_PAGE_SIZE);
    }

    #[test]
    fn test_per_page_honors_small_limits() {
        let filter = TaskFilter {
            limit: Some(5),
            ..Default::default()
        };
        assert_eq!(filter.per_page(), 5);

        let filter = TaskFilter {
            limit: Some(20),
            ..Default::default()
        };
        assert_eq!(filter.per_page(), 20);
    }

    #[test]
    fn test_per_page_defaults() {
        let filter = TaskFilter::default();
        assert_eq!(filter.per_page(), DEFAULT_PAGE_SIZE);
        assert_eq!(filter.page(), 1);
        assert_eq!(filter.offset(), 0);
    }

    #[test]
    fn test_offset_uses_effective_limit() {
        let filter = TaskFilter {
            page: Some(3),
            limit: Some(100), // clamped to 20
            ..Default::default()
        };
        assert_eq!(filter.offset(), 40);
    }

    #[test]
    fn test_page_meta_last_page() {
        assert_eq!(PageMeta::new(1, 20, 0).last_page, 1);
        assert_eq!(PageMeta::new(1, 20, 20).last_page, 1);
        assert_eq!(PageMeta::new(1, 20, 21).last_page, 2);
        assert_eq!(PageMeta::new(2, 5, 11).last_page, 3);
    }

    #[test]
    fn test_status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&TaskStatus::Incomplete).unwrap(),
            "\"incomplete\""
        );
        assert_eq!(
            serde_json::to_string(&TaskCategory::Documentation).unwrap(),
            "\"documentation\""
        );
        assert_eq!(
            serde_json::to_string(&TaskPriority::High).unwrap(),
            "\"high\""
        );
    }

    // Integration tests for database operations are in taskmate-api/tests/.
}
