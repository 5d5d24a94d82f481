//! contact_messages table queries

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::SqlitePool;

/// Triage states a message moves through.
pub const MESSAGE_STATUSES: &[&str] = &["new", "read", "resolved"];

#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct ContactMessageRow {
    pub id: String,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// Message counts per triage state, for the inbox badges.
#[derive(Debug, Clone, Serialize)]
pub struct MessageCounts {
    pub new: i64,
    pub read: i64,
    pub resolved: i64,
}

pub async fn insert_message(
    pool: &SqlitePool,
    id: &str,
    name: &str,
    email: &str,
    subject: &str,
    message: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO contact_messages (id, name, email, subject, message, status, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, 'new', ?6)",
    )
    .bind(id)
    .bind(name)
    .bind(email)
    .bind(subject)
    .bind(message)
    .bind(Utc::now())
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn list_messages(
    pool: &SqlitePool,
    status: Option<&str>,
) -> Result<Vec<ContactMessageRow>, sqlx::Error> {
    match status {
        Some(status) => {
            sqlx::query_as(
                "SELECT id, name, email, subject, message, status, created_at
                 FROM contact_messages WHERE status = ?1 ORDER BY created_at DESC",
            )
            .bind(status)
            .fetch_all(pool)
            .await
        }
        None => {
            sqlx::query_as(
                "SELECT id, name, email, subject, message, status, created_at
                 FROM contact_messages ORDER BY created_at DESC",
            )
            .fetch_all(pool)
            .await
        }
    }
}

pub async fn get_message(
    pool: &SqlitePool,
    id: &str,
) -> Result<Option<ContactMessageRow>, sqlx::Error> {
    sqlx::query_as(
        "SELECT id, name, email, subject, message, status, created_at
         FROM contact_messages WHERE id = ?1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn set_message_status(
    pool: &SqlitePool,
    id: &str,
    status: &str,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("UPDATE contact_messages SET status = ?1 WHERE id = ?2")
        .bind(status)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn delete_message(pool: &SqlitePool, id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM contact_messages WHERE id = ?1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn count_messages_by_status(pool: &SqlitePool) -> Result<MessageCounts, sqlx::Error> {
    let rows: Vec<(String, i64)> =
        sqlx::query_as("SELECT status, COUNT(*) FROM contact_messages GROUP BY status")
            .fetch_all(pool)
            .await?;

    let mut counts = MessageCounts {
        new: 0,
        read: 0,
        resolved: 0,
    };
    for (status, count) in rows {
        match status.as_str() {
            "new" => counts.new = count,
            "read" => counts.read = count,
            "resolved" => counts.resolved = count,
            _ => {}
        }
    }

    Ok(counts)
}
