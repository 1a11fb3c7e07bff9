/// Share grant model and database operations
///
/// A share grant gives a non-owning user read access to a task. Grants form
/// a many-to-many relationship between tasks and users, keyed on
/// (task, recipient) so re-sharing is naturally idempotent.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE shared_tasks (
///     task_id UUID NOT NULL REFERENCES tasks(id) ON DELETE CASCADE,
///     shared_with UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     shared_by UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     PRIMARY KEY (task_id, shared_with)
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Share grant linking a task to a recipient user
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ShareGrant {
    /// Task being shared
    pub task_id: Uuid,

    /// User receiving access
    pub shared_with: Uuid,

    /// User who granted the access
    pub shared_by: Uuid,

    /// When the grant was created
    pub created_at: DateTime<Utc>,
}

impl ShareGrant {
    /// Creates a grant if one does not already exist
    ///
    /// Idempotent: sharing the same task to the same recipient twice leaves
    /// exactly one row and is not an error. Returns true when a new row was
    /// inserted.
    ///
    /// # Errors
    ///
    /// Returns a database error if the task or either user does not exist
    /// (foreign key violation).
    pub async fn grant(
        pool: &PgPool,
        task_id: Uuid,
        shared_with: Uuid,
        shared_by: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            INSERT INTO shared_tasks (task_id, shared_with, shared_by)
            VALUES ($1, $2, $3)
            ON CONFLICT (task_id, shared_with) DO NOTHING
            "#,
        )
        .bind(task_id)
        .bind(shared_with)
        .bind(shared_by)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Whether a grant exists for (task, recipient)
    pub async fn exists(
        pool: &PgPool,
        task_id: Uuid,
        shared_with: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let (found,): (bool,) = sqlx::query_as(
            "SELECT EXISTS (SELECT 1 FROM shared_tasks WHERE task_id = $1 AND shared_with = $2)",
        )
        .bind(task_id)
        .bind(shared_with)
        .fetch_one(pool)
        .await?;

        Ok(found)
    }

    /// Counts grants for a task, optionally restricted to one recipient
    pub async fn count_for_task(
        pool: &PgPool,
        task_id: Uuid,
        shared_with: Option<Uuid>,
    ) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = match shared_with {
            Some(recipient) => {
                sqlx::query_as(
                    "SELECT COUNT(*) FROM shared_tasks WHERE task_id = $1 AND shared_with = $2",
                )
                .bind(task_id)
                .bind(recipient)
                .fetch_one(pool)
                .await?
            }
            None => {
                sqlx::query_as("SELECT COUNT(*) FROM shared_tasks WHERE task_id = $1")
                    .bind(task_id)
                    .fetch_one(pool)
                    .await?
            }
        };

        Ok(count)
    }
}
