//! activity_log table queries

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::SqlitePool;
use ulid::Ulid;

use crate::auth::Principal;

#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct ActivityRow {
    pub id: String,
    pub actor_id: String,
    pub actor_email: String,
    pub action: String,
    pub entity_type: Option<String>,
    pub entity_id: Option<String>,
    pub detail: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Append an audit entry. Call sites treat failures as non-fatal and only
/// log them; a lost audit row must not fail the action it describes.
pub async fn record_activity(
    pool: &SqlitePool,
    actor: &Principal,
    action: &str,
    entity_type: Option<&str>,
    entity_id: Option<&str>,
    detail: Option<String>,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO activity_log (id, actor_id, actor_email, action, entity_type, entity_id,
                                   detail, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
    )
    .bind(Ulid::new().to_string())
    .bind(&actor.id)
    .bind(&actor.email)
    .bind(action)
    .bind(entity_type)
    .bind(entity_id)
    .bind(detail)
    .bind(Utc::now())
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn list_activity(pool: &SqlitePool, limit: i64) -> Result<Vec<ActivityRow>, sqlx::Error> {
    sqlx::query_as(
        "SELECT id, actor_id, actor_email, action, entity_type, entity_id, detail, created_at
         FROM activity_log ORDER BY created_at DESC LIMIT ?1",
    )
    .bind(limit)
    .fetch_all(pool)
    .await
}
