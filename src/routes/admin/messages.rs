//! Contact-message triage route handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::auth::permissions::{require_permission, Permission};
use crate::auth::CurrentUser;
use crate::error::AppError;
use crate::queries::activity::record_activity;
use crate::queries::messages::{
    self, ContactMessageRow, MESSAGE_STATUSES,
};
use crate::routes::AppState;

#[derive(Debug, Deserialize)]
pub struct MessageFilterQuery {
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct MessageStatusInput {
    pub status: String,
}

/// GET /api/admin/messages - inbox listing with optional status filter
pub async fn list_messages(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Query(query): Query<MessageFilterQuery>,
) -> Result<Json<Value>, AppError> {
    require_permission(&actor, Permission::ViewMessages)?;

    if let Some(status) = &query.status {
        if !MESSAGE_STATUSES.contains(&status.as_str()) {
            return Err(AppError::Validation(vec![format!(
                "Unknown status: {status}"
            )]));
        }
    }

    let rows = messages::list_messages(&state.pool, query.status.as_deref()).await?;
    let counts = messages::count_messages_by_status(&state.pool).await?;

    Ok(Json(json!({"messages": rows, "counts": counts})))
}

/// GET /api/admin/messages/{id}
pub async fn get_message(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(message_id): Path<String>,
) -> Result<Json<ContactMessageRow>, AppError> {
    require_permission(&actor, Permission::ViewMessages)?;

    messages::get_message(&state.pool, &message_id)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound("Message"))
}

/// PATCH /api/admin/messages/{id} - move a message through triage
pub async fn update_message_status(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(message_id): Path<String>,
    Json(input): Json<MessageStatusInput>,
) -> Result<Json<ContactMessageRow>, AppError> {
    require_permission(&actor, Permission::EditMessages)?;

    if !MESSAGE_STATUSES.contains(&input.status.as_str()) {
        return Err(AppError::Validation(vec![format!(
            "Unknown status: {}",
            input.status
        )]));
    }

    if !messages::set_message_status(&state.pool, &message_id, &input.status).await? {
        return Err(AppError::NotFound("Message"));
    }

    info!(
        actor_id = %actor.id,
        message_id = %message_id,
        status = %input.status,
        "contact message triaged"
    );

    if let Err(e) = record_activity(
        &state.pool,
        &actor,
        "message.triage",
        Some("message"),
        Some(&message_id),
        Some(format!("status={}", input.status)),
    )
    .await
    {
        warn!(error = %e, "failed to record activity");
    }

    messages::get_message(&state.pool, &message_id)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound("Message"))
}

/// DELETE /api/admin/messages/{id}
pub async fn delete_message(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(message_id): Path<String>,
) -> Result<StatusCode, AppError> {
    require_permission(&actor, Permission::DeleteMessages)?;

    if !messages::delete_message(&state.pool, &message_id).await? {
        return Err(AppError::NotFound("Message"));
    }

    if let Err(e) = record_activity(
        &state.pool,
        &actor,
        "message.delete",
        Some("message"),
        Some(&message_id),
        None,
    )
    .await
    {
        warn!(error = %e, "failed to record activity");
    }

    Ok(StatusCode::NO_CONTENT)
}
