/// Task model and database operations
///
/// Tasks are the core entity of Taskhive. Every task belongs to exactly one
/// owner, and every query here is owner-scoped: visibility, mutation and
/// deletion all require `owner_id` to match the authenticated caller. A
/// single conditional statement (`WHERE id = $1 AND owner_id = $2`) carries
/// the invariant; the API layer never does read-check-write.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE task_status AS ENUM ('pending', 'in_progress', 'completed');
/// CREATE TYPE task_priority AS ENUM ('low', 'medium', 'high');
///
/// CREATE TABLE tasks (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     owner_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     title VARCHAR(100) NOT NULL,
///     description VARCHAR(500),
///     status task_status NOT NULL DEFAULT 'pending',
///     priority task_priority NOT NULL DEFAULT 'medium',
///     due_date TIMESTAMPTZ,
///     tags TEXT[] NOT NULL DEFAULT '{}',
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use taskhive_shared::models::task::{CreateTask, Task, TaskPriority, TaskStatus};
/// use taskhive_shared::db::pool::{create_pool, DatabaseConfig};
/// use uuid::Uuid;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let task = Task::create(&pool, CreateTask {
///     owner_id: Uuid::new_v4(),
///     title: "Ship release".to_string(),
///     description: None,
///     status: TaskStatus::Pending,
///     priority: TaskPriority::High,
///     due_date: None,
///     tags: vec!["release".to_string()],
/// }).await?;
/// # Ok(())
/// # }
/// ```
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Task status
///
/// Serialized as `pending` / `in-progress` / `completed` on the wire,
/// `in_progress` in the Postgres enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_status", rename_all = "snake_case")]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    Pending,
    InProgress,
    Completed,
}

impl Default for TaskStatus {
    fn default() -> Self {
        TaskStatus::Pending
    }
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in-progress",
            TaskStatus::Completed => "completed",
        }
    }
}

/// Task priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_priority", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    Low,
    Medium,
    High,
}

impl Default for TaskPriority {
    fn default() -> Self {
        TaskPriority::Medium
    }
}

impl TaskPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskPriority::Low => "low",
            TaskPriority::Medium => "medium",
            TaskPriority::High => "high",
        }
    }
}

/// Task model
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique task ID
    pub id: Uuid,

    /// Owner; set from the authenticated caller at creation, immutable after
    pub owner_id: Uuid,

    /// Title, at most 100 chars
    pub title: String,

    /// Optional description, at most 500 chars
    pub description: Option<String>,

    /// Current status
    pub status: TaskStatus,

    /// Priority
    pub priority: TaskPriority,

    /// Optional due date
    pub due_date: Option<DateTime<Utc>>,

    /// Ordered tags, each trimmed and at most 20 chars
    pub tags: Vec<String>,

    /// Set once at creation
    pub created_at: DateTime<Utc>,

    /// Set at creation and refreshed on every mutation
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new task
#[derive(Debug, Clone)]
pub struct CreateTask {
    pub owner_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub due_date: Option<DateTime<Utc>>,
    pub tags: Vec<String>,
}

/// Input for a partial task update
///
/// Only non-None fields are written; `updated_at` is refreshed regardless.
#[derive(Debug, Clone, Default)]
pub struct UpdateTask {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub due_date: Option<DateTime<Utc>>,
    pub tags: Option<Vec<String>>,
}

impl UpdateTask {
    /// True when no field would be written
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.status.is_none()
            && self.priority.is_none()
            && self.due_date.is_none()
            && self.tags.is_none()
    }
}

/// Optional equality filters for task listing
#[derive(Debug, Clone, Copy, Default)]
pub struct TaskFilter {
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
}

const TASK_COLUMNS: &str = "id, owner_id, title, description, status, priority, \
                            due_date, tags, created_at, updated_at";

impl Task {
    /// Creates a new task
    ///
    /// `created_at` and `updated_at` are both set to the insertion time.
    pub async fn create(pool: &PgPool, data: CreateTask) -> Result<Self, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (owner_id, title, description, status, priority, due_date, tags)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, owner_id, title, description, status, priority,
                      due_date, tags, created_at, updated_at
            "#,
        )
        .bind(data.owner_id)
        .bind(data.title)
        .bind(data.description)
        .bind(data.status)
        .bind(data.priority)
        .bind(data.due_date)
        .bind(data.tags)
        .fetch_one(pool)
        .await?;

        Ok(task)
    }

    /// Finds a task by ID, scoped to its owner
    ///
    /// Returns None both when the task does not exist and when it belongs to
    /// someone else; callers cannot distinguish the two.
    pub async fn find_by_id_and_owner(
        pool: &PgPool,
        id: Uuid,
        owner_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, owner_id, title, description, status, priority,
                   due_date, tags, created_at, updated_at
            FROM tasks
            WHERE id = $1 AND owner_id = $2
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Lists an owner's tasks with optional filters, newest first
    ///
    /// `limit`/`offset` must already be clamped by the caller.
    pub async fn list_by_owner(
        pool: &PgPool,
        owner_id: Uuid,
        filter: TaskFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let tasks = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, owner_id, title, description, status, priority,
                   due_date, tags, created_at, updated_at
            FROM tasks
            WHERE owner_id = $1
              AND ($2::task_status IS NULL OR status = $2)
              AND ($3::task_priority IS NULL OR priority = $3)
            ORDER BY created_at DESC
            LIMIT $4 OFFSET $5
            "#,
        )
        .bind(owner_id)
        .bind(filter.status)
        .bind(filter.priority)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }

    /// Counts an owner's tasks under the same filters as [`Self::list_by_owner`]
    pub async fn count_by_owner(
        pool: &PgPool,
        owner_id: Uuid,
        filter: TaskFilter,
    ) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*)
            FROM tasks
            WHERE owner_id = $1
              AND ($2::task_status IS NULL OR status = $2)
              AND ($3::task_priority IS NULL OR priority = $3)
            "#,
        )
        .bind(owner_id)
        .bind(filter.status)
        .bind(filter.priority)
        .fetch_one(pool)
        .await?;

        Ok(count)
    }

    /// Applies a partial update to a task the owner holds
    ///
    /// The update is a single conditional statement; if no row matches
    /// `{id, owner_id}` nothing is written and None is returned. `updated_at`
    /// is always refreshed on a match.
    pub async fn update_by_owner(
        pool: &PgPool,
        id: Uuid,
        owner_id: Uuid,
        data: UpdateTask,
    ) -> Result<Option<Self>, sqlx::Error> {
        if data.is_empty() {
            // Nothing to write; still refresh updated_at only if the row is owned.
            return Self::touch_by_owner(pool, id, owner_id).await;
        }

        // Build the SET clause from whichever fields are present.
        let mut query = String::from("UPDATE tasks SET updated_at = NOW()");
        let mut bind_count = 2;

        if data.title.is_some() {
            bind_count += 1;
            query.push_str(&format!(", title = ${}", bind_count));
        }
        if data.description.is_some() {
            bind_count += 1;
            query.push_str(&format!(", description = ${}", bind_count));
        }
        if data.status.is_some() {
            bind_count += 1;
            query.push_str(&format!(", status = ${}", bind_count));
        }
        if data.priority.is_some() {
            bind_count += 1;
            query.push_str(&format!(", priority = ${}", bind_count));
        }
        if data.due_date.is_some() {
            bind_count += 1;
            query.push_str(&format!(", due_date = ${}", bind_count));
        }
        if data.tags.is_some() {
            bind_count += 1;
            query.push_str(&format!(", tags = ${}", bind_count));
        }

        query.push_str(" WHERE id = $1 AND owner_id = $2 RETURNING ");
        query.push_str(TASK_COLUMNS);

        let mut q = sqlx::query_as::<_, Task>(&query).bind(id).bind(owner_id);

        if let Some(title) = data.title {
            q = q.bind(title);
        }
        if let Some(description) = data.description {
            q = q.bind(description);
        }
        if let Some(status) = data.status {
            q = q.bind(status);
        }
        if let Some(priority) = data.priority {
            q = q.bind(priority);
        }
        if let Some(due_date) = data.due_date {
            q = q.bind(due_date);
        }
        if let Some(tags) = data.tags {
            q = q.bind(tags);
        }

        let task = q.fetch_optional(pool).await?;

        Ok(task)
    }

    /// Refreshes `updated_at` without changing any other field
    async fn touch_by_owner(
        pool: &PgPool,
        id: Uuid,
        owner_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            UPDATE tasks
            SET updated_at = NOW()
            WHERE id = $1 AND owner_id = $2
            RETURNING id, owner_id, title, description, status, priority,
                      due_date, tags, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Deletes a task the owner holds
    ///
    /// Returns false both for a missing task and a non-owned one.
    pub async fn delete_by_owner(
        pool: &PgPool,
        id: Uuid,
        owner_id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1 AND owner_id = $2")
            .bind(id)
            .bind(owner_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_defaults_and_wire_names() {
        assert_eq!(TaskStatus::default(), TaskStatus::Pending);
        assert_eq!(TaskPriority::default(), TaskPriority::Medium);

        assert_eq!(
            serde_json::to_value(TaskStatus::InProgress).unwrap(),
            "in-progress"
        );
        assert_eq!(serde_json::to_value(TaskStatus::Pending).unwrap(), "pending");
        assert_eq!(serde_json::to_value(TaskPriority::High).unwrap(), "high");
    }

    #[test]
    fn test_status_round_trip() {
        for status in [
            TaskStatus::Pending,
            TaskStatus::InProgress,
            TaskStatus::Completed,
        ] {
            let json = serde_json::to_string(&status).unwrap();
            let back: TaskStatus = serde_json::from_str(&json).unwrap();
            assert_eq!(status, back);
        }

        assert!(serde_json::from_str::<TaskStatus>("\"in_progress\"").is_err());
        assert!(serde_json::from_str::<TaskStatus>("\"done\"").is_err());
    }

    #[test]
    fn test_update_task_is_empty() {
        assert!(UpdateTask::default().is_empty());

        let update = UpdateTask {
            status: Some(TaskStatus::Completed),
            ..Default::default()
        };
        assert!(!update.is_empty());
    }

    #[test]
    fn test_task_serializes_camel_case() {
        let task = Task {
            id: Uuid::new_v4(),
            owner_id: Uuid::new_v4(),
            title: "Write report".to_string(),
            description: None,
            status: TaskStatus::InProgress,
            priority: TaskPriority::Low,
            due_date: None,
            tags: vec!["a".to_string(), "b".to_string()],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["status"], "in-progress");
        assert_eq!(json["tags"][0], "a");
        assert_eq!(json["tags"][1], "b");
        assert!(json.get("ownerId").is_some());
        assert!(json.get("dueDate").is_some());
        assert!(json.get("createdAt").is_some());
        assert!(json.get("updatedAt").is_some());
    }

    // Owner-scoped query behavior is exercised against a live Postgres.
}
