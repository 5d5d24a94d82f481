//! meetings table queries

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{QueryBuilder, SqlitePool};

#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct MeetingRow {
    pub id: String,
    pub title: String,
    pub agenda: Option<String>,
    pub location: Option<String>,
    pub starts_at: DateTime<Utc>,
    pub notes: Option<String>,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub struct NewMeeting {
    pub id: String,
    pub title: String,
    pub agenda: Option<String>,
    pub location: Option<String>,
    pub starts_at: DateTime<Utc>,
    pub created_by: String,
}

#[derive(Debug, Default)]
pub struct MeetingUpdate {
    pub title: Option<String>,
    pub agenda: Option<String>,
    pub location: Option<String>,
    pub starts_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

pub async fn insert_meeting(pool: &SqlitePool, meeting: &NewMeeting) -> Result<(), sqlx::Error> {
    let now = Utc::now();
    sqlx::query(
        "INSERT INTO meetings (id, title, agenda, location, starts_at, created_by,
                               created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
    )
    .bind(&meeting.id)
    .bind(&meeting.title)
    .bind(&meeting.agenda)
    .bind(&meeting.location)
    .bind(meeting.starts_at)
    .bind(&meeting.created_by)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn list_meetings(pool: &SqlitePool) -> Result<Vec<MeetingRow>, sqlx::Error> {
    sqlx::query_as(
        "SELECT id, title, agenda, location, starts_at, notes, created_by, created_at, updated_at
         FROM meetings ORDER BY starts_at",
    )
    .fetch_all(pool)
    .await
}

pub async fn get_meeting(pool: &SqlitePool, id: &str) -> Result<Option<MeetingRow>, sqlx::Error> {
    sqlx::query_as(
        "SELECT id, title, agenda, location, starts_at, notes, created_by, created_at, updated_at
         FROM meetings WHERE id = ?1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn update_meeting(
    pool: &SqlitePool,
    id: &str,
    update: &MeetingUpdate,
) -> Result<bool, sqlx::Error> {
    let mut builder = QueryBuilder::new("UPDATE meetings SET updated_at = ");
    builder.push_bind(Utc::now());

    if let Some(title) = &update.title {
        builder.push(", title = ").push_bind(title);
    }
    if let Some(agenda) = &update.agenda {
        builder.push(", agenda = ").push_bind(agenda);
    }
    if let Some(location) = &update.location {
        builder.push(", location = ").push_bind(location);
    }
    if let Some(starts_at) = update.starts_at {
        builder.push(", starts_at = ").push_bind(starts_at);
    }
    if let Some(notes) = &update.notes {
        builder.push(", notes = ").push_bind(notes);
    }

    builder.push(" WHERE id = ").push_bind(id);

    let result = builder.build().execute(pool).await?;
    Ok(result.rows_affected() > 0)
}

pub async fn delete_meeting(pool: &SqlitePool, id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM meetings WHERE id = ?1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
