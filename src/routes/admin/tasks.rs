//! Logistics task route handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::info;
use ulid::Ulid;
use validator::Validate;

use crate::auth::permissions::{require_permission, Permission};
use crate::auth::CurrentUser;
use crate::error::AppError;
use crate::queries::tasks::{self, NewTask, TaskRow, TaskUpdate, TASK_STATUSES};
use crate::routes::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateTaskInput {
    #[validate(length(min = 1, max = 200, message = "Title must be between 1 and 200 characters"))]
    pub title: String,
    pub description: Option<String>,
    pub assigned_to: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
}

/// Sparse update; `assigned_to`/`due_date` distinguish "absent" (unchanged)
/// from explicit null (cleared).
#[derive(Debug, Deserialize, Default)]
pub struct UpdateTaskInput {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub assigned_to: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub due_date: Option<Option<DateTime<Utc>>>,
}

fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: serde::Deserialize<'de>,
    D: serde::Deserializer<'de>,
{
    serde::Deserialize::deserialize(deserializer).map(Some)
}

#[derive(Debug, Deserialize)]
pub struct TaskFilterQuery {
    pub status: Option<String>,
}

/// GET /api/admin/tasks
pub async fn list_tasks(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Query(query): Query<TaskFilterQuery>,
) -> Result<Json<Vec<TaskRow>>, AppError> {
    require_permission(&actor, Permission::ViewTasks)?;

    if let Some(status) = &query.status {
        if !TASK_STATUSES.contains(&status.as_str()) {
            return Err(AppError::Validation(vec![format!(
                "Unknown status: {status}"
            )]));
        }
    }

    Ok(Json(
        tasks::list_tasks(&state.pool, query.status.as_deref()).await?,
    ))
}

/// GET /api/admin/tasks/{id}
pub async fn get_task(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(task_id): Path<String>,
) -> Result<Json<TaskRow>, AppError> {
    require_permission(&actor, Permission::ViewTasks)?;

    tasks::get_task(&state.pool, &task_id)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound("Task"))
}

/// POST /api/admin/tasks
pub async fn create_task(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Json(input): Json<CreateTaskInput>,
) -> Result<(StatusCode, Json<TaskRow>), AppError> {
    require_permission(&actor, Permission::CreateTasks)?;

    input.validate()?;

    let task = NewTask {
        id: Ulid::new().to_string(),
        title: input.title,
        description: input.description,
        assigned_to: input.assigned_to,
        due_date: input.due_date,
        created_by: actor.id.clone(),
    };
    tasks::insert_task(&state.pool, &task).await?;

    info!(actor_id = %actor.id, task_id = %task.id, "task created");

    let created = tasks::get_task(&state.pool, &task.id)
        .await?
        .ok_or(AppError::NotFound("Task"))?;

    Ok((StatusCode::CREATED, Json(created)))
}

/// PATCH /api/admin/tasks/{id}
pub async fn update_task(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(task_id): Path<String>,
    Json(input): Json<UpdateTaskInput>,
) -> Result<Json<TaskRow>, AppError> {
    require_permission(&actor, Permission::EditTasks)?;

    if let Some(status) = &input.status {
        if !TASK_STATUSES.contains(&status.as_str()) {
            return Err(AppError::Validation(vec![format!(
                "Unknown status: {status}"
            )]));
        }
    }

    let update = TaskUpdate {
        title: input.title,
        description: input.description,
        status: input.status,
        assigned_to: input.assigned_to,
        due_date: input.due_date,
    };

    if !tasks::update_task(&state.pool, &task_id, &update).await? {
        return Err(AppError::NotFound("Task"));
    }

    tasks::get_task(&state.pool, &task_id)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound("Task"))
}

/// DELETE /api/admin/tasks/{id}
pub async fn delete_task(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(task_id): Path<String>,
) -> Result<StatusCode, AppError> {
    require_permission(&actor, Permission::DeleteTasks)?;

    if !tasks::delete_task(&state.pool, &task_id).await? {
        return Err(AppError::NotFound("Task"));
    }

    Ok(StatusCode::NO_CONTENT)
}
