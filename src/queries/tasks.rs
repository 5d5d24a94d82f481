//! tasks table queries

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{QueryBuilder, SqlitePool};

pub const TASK_STATUSES: &[&str] = &["todo", "in_progress", "done"];

#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct TaskRow {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub status: String,
    pub assigned_to: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub struct NewTask {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub assigned_to: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub created_by: String,
}

#[derive(Debug, Default)]
pub struct TaskUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub assigned_to: Option<Option<String>>,
    pub due_date: Option<Option<DateTime<Utc>>>,
}

pub async fn insert_task(pool: &SqlitePool, task: &NewTask) -> Result<(), sqlx::Error> {
    let now = Utc::now();
    sqlx::query(
        "INSERT INTO tasks (id, title, description, status, assigned_to, due_date, created_by,
                            created_at, updated_at)
         VALUES (?1, ?2, ?3, 'todo', ?4, ?5, ?6, ?7, ?8)",
    )
    .bind(&task.id)
    .bind(&task.title)
    .bind(&task.description)
    .bind(&task.assigned_to)
    .bind(task.due_date)
    .bind(&task.created_by)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn list_tasks(
    pool: &SqlitePool,
    status: Option<&str>,
) -> Result<Vec<TaskRow>, sqlx::Error> {
    match status {
        Some(status) => {
            sqlx::query_as(
                "SELECT id, title, description, status, assigned_to, due_date, created_by,
                        created_at, updated_at
                 FROM tasks WHERE status = ?1 ORDER BY created_at DESC",
            )
            .bind(status)
            .fetch_all(pool)
            .await
        }
        None => {
            sqlx::query_as(
                "SELECT id, title, description, status, assigned_to, due_date, created_by,
                        created_at, updated_at
                 FROM tasks ORDER BY created_at DESC",
            )
            .fetch_all(pool)
            .await
        }
    }
}

pub async fn get_task(pool: &SqlitePool, id: &str) -> Result<Option<TaskRow>, sqlx::Error> {
    sqlx::query_as(
        "SELECT id, title, description, status, assigned_to, due_date, created_by,
                created_at, updated_at
         FROM tasks WHERE id = ?1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn update_task(
    pool: &SqlitePool,
    id: &str,
    update: &TaskUpdate,
) -> Result<bool, sqlx::Error> {
    let mut builder = QueryBuilder::new("UPDATE tasks SET updated_at = ");
    builder.push_bind(Utc::now());

    if let Some(title) = &update.title {
        builder.push(", title = ").push_bind(title);
    }
    if let Some(description) = &update.description {
        builder.push(", description = ").push_bind(description);
    }
    if let Some(status) = &update.status {
        builder.push(", status = ").push_bind(status);
    }
    if let Some(assigned_to) = &update.assigned_to {
        builder.push(", assigned_to = ").push_bind(assigned_to);
    }
    if let Some(due_date) = &update.due_date {
        builder.push(", due_date = ").push_bind(*due_date);
    }

    builder.push(" WHERE id = ").push_bind(id);

    let result = builder.build().execute(pool).await?;
    Ok(result.rows_affected() > 0)
}

pub async fn delete_task(pool: &SqlitePool, id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM tasks WHERE id = ?1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
