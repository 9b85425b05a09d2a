/// Owner-scoped task CRUD endpoints
///
/// # Endpoints
///
/// - `GET    /api/tasks`     - List own tasks, paginated and filtered
/// - `POST   /api/tasks`     - Create task
/// - `PUT    /api/tasks/:id` - Update own task
/// - `DELETE /api/tasks/:id` - Delete own task
///
/// Every query is restricted to `owner_id == caller`; the owner comes from
/// the validated token, never from client input. Update and delete answer an
/// identical 404 for a task that does not exist and a task owned by someone
/// else, so the API cannot be used to probe for other users' task IDs.
use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::ValidatedJson,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use taskhive_shared::{
    auth::middleware::AuthContext,
    models::task::{CreateTask, Task, TaskFilter, TaskPriority, TaskStatus, UpdateTask},
};
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// Default page size when the client does not supply `limit`
const DEFAULT_PAGE_SIZE: i64 = 10;

/// Upper bound on `limit`; larger requests are clamped, not rejected
const MAX_PAGE_SIZE: i64 = 100;

/// Query parameters for task listing
#[derive(Debug, Default, Deserialize)]
pub struct ListTasksQuery {
    /// 1-based page number
    pub page: Option<i64>,

    /// Page size
    pub limit: Option<i64>,

    /// Optional equality filter on status
    pub status: Option<TaskStatus>,

    /// Optional equality filter on priority
    pub priority: Option<TaskPriority>,
}

/// Pagination window derived from raw query parameters
///
/// Raw values are clamped here and never used directly for offset math.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PageWindow {
    page: i64,
    limit: i64,
}

impl PageWindow {
    fn from_query(page: Option<i64>, limit: Option<i64>) -> Self {
        // Cap page so (page - 1) * limit stays inside i64 for any limit.
        Self {
            page: page.unwrap_or(1).clamp(1, i64::MAX / MAX_PAGE_SIZE),
            limit: limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE),
        }
    }

    fn offset(&self) -> i64 {
        (self.page - 1) * self.limit
    }

    fn total_pages(&self, total: i64) -> i64 {
        (total + self.limit - 1) / self.limit
    }
}

/// Task list response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListTasksResponse {
    /// Tasks on this page, newest first
    pub tasks: Vec<Task>,

    /// Total tasks matching the filters
    pub total: i64,

    /// The (clamped) page served
    pub current_page: i64,

    /// ceil(total / limit)
    pub total_pages: i64,
}

/// Task create/update body
///
/// All fields except `title` are optional on create; on update `title` is
/// optional too (partial writes). Unknown statuses/priorities and unparseable
/// due dates are rejected at deserialization.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TaskWriteRequest {
    #[validate(custom(function = "validate_title"))]
    pub title: Option<String>,

    #[validate(custom(function = "validate_description"))]
    pub description: Option<String>,

    pub status: Option<TaskStatus>,

    pub priority: Option<TaskPriority>,

    pub due_date: Option<DateTime<Utc>>,

    #[validate(custom(function = "validate_tags"))]
    pub tags: Option<Vec<String>>,
}

/// Delete confirmation
#[derive(Debug, Serialize)]
pub struct DeleteTaskResponse {
    pub message: String,
}

// Length rules run on the trimmed value, matching what gets stored.
fn validate_title(title: &str) -> Result<(), ValidationError> {
    if title.trim().chars().count() > 100 {
        let mut err = ValidationError::new("title_length");
        err.message = Some("Title must be 1-100 characters".into());
        return Err(err);
    }
    Ok(())
}

fn validate_description(description: &str) -> Result<(), ValidationError> {
    if description.trim().chars().count() > 500 {
        let mut err = ValidationError::new("description_length");
        err.message = Some("Description must be at most 500 characters".into());
        return Err(err);
    }
    Ok(())
}

fn validate_tags(tags: &Vec<String>) -> Result<(), ValidationError> {
    if tags.iter().any(|tag| tag.trim().chars().count() > 20) {
        let mut err = ValidationError::new("tag_length");
        err.message = Some("Tags must be at most 20 characters".into());
        return Err(err);
    }
    Ok(())
}

/// Trims each tag, preserving order
fn normalize_tags(tags: Vec<String>) -> Vec<String> {
    tags.into_iter().map(|tag| tag.trim().to_string()).collect()
}

/// List own tasks
///
/// ```text
/// GET /api/tasks?page=1&limit=10&status=pending&priority=high
/// Authorization: Bearer <token>
/// ```
///
/// Response:
/// ```json
/// { "tasks": [...], "total": 12, "currentPage": 1, "totalPages": 2 }
/// ```
pub async fn list_tasks(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Query(query): Query<ListTasksQuery>,
) -> ApiResult<Json<ListTasksResponse>> {
    let window = PageWindow::from_query(query.page, query.limit);
    let filter = TaskFilter {
        status: query.status,
        priority: query.priority,
    };

    let total = Task::count_by_owner(&state.db, auth.user_id, filter).await?;
    let tasks = Task::list_by_owner(
        &state.db,
        auth.user_id,
        filter,
        window.limit,
        window.offset(),
    )
    .await?;

    Ok(Json(ListTasksResponse {
        tasks,
        total,
        current_page: window.page,
        total_pages: window.total_pages(total),
    }))
}

/// Create a task
///
/// ```text
/// POST /api/tasks
/// Authorization: Bearer <token>
/// Content-Type: application/json
///
/// { "title": "Ship release", "priority": "high", "tags": ["release"] }
/// ```
///
/// The owner is always the authenticated caller; the request schema has no
/// owner field.
pub async fn create_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    ValidatedJson(req): ValidatedJson<TaskWriteRequest>,
) -> ApiResult<(StatusCode, Json<Task>)> {
    let title = req
        .title
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(String::from)
        .ok_or_else(|| ApiError::BadRequest("Title is required".to_string()))?;

    let task = Task::create(
        &state.db,
        CreateTask {
            owner_id: auth.user_id,
            title,
            description: req.description.map(|d| d.trim().to_string()),
            status: req.status.unwrap_or_default(),
            priority: req.priority.unwrap_or_default(),
            due_date: req.due_date,
            tags: normalize_tags(req.tags.unwrap_or_default()),
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(task)))
}

/// Update own task (partial)
///
/// ```text
/// PUT /api/tasks/:id
/// Authorization: Bearer <token>
/// Content-Type: application/json
///
/// { "status": "completed" }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: validation failed
/// - `404 Not Found`: no task with this ID owned by the caller
pub async fn update_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<TaskWriteRequest>,
) -> ApiResult<Json<Task>> {
    let update = UpdateTask {
        title: req.title.map(|t| t.trim().to_string()),
        description: req.description.map(|d| d.trim().to_string()),
        status: req.status,
        priority: req.priority,
        due_date: req.due_date,
        tags: req.tags.map(normalize_tags),
    };

    if let Some(title) = &update.title {
        if title.is_empty() {
            return Err(ApiError::BadRequest("Title cannot be empty".to_string()));
        }
    }

    let task = Task::update_by_owner(&state.db, id, auth.user_id, update)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    Ok(Json(task))
}

/// Delete own task
///
/// ```text
/// DELETE /api/tasks/:id
/// Authorization: Bearer <token>
/// ```
///
/// # Errors
///
/// - `404 Not Found`: no task with this ID owned by the caller
pub async fn delete_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<DeleteTaskResponse>> {
    let deleted = Task::delete_by_owner(&state.db, id, auth.user_id).await?;

    if !deleted {
        return Err(ApiError::NotFound("Task not found".to_string()));
    }

    Ok(Json(DeleteTaskResponse {
        message: "Task deleted successfully".to_string(),
    }))
}
