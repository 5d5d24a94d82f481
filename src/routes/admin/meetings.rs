//! Organizer meeting route handlers

use axum::{
    extract::{Path, State},
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
use crate::queries::meetings::{self, MeetingRow, MeetingUpdate, NewMeeting};
use crate::routes::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateMeetingInput {
    #[validate(length(min = 1, max = 200, message = "Title must be between 1 and 200 characters"))]
    pub title: String,
    pub agenda: Option<String>,
    pub location: Option<String>,
    pub starts_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Default)]
pub struct UpdateMeetingInput {
    pub title: Option<String>,
    pub agenda: Option<String>,
    pub location: Option<String>,
    pub starts_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

/// GET /api/admin/meetings
pub async fn list_meetings(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
) -> Result<Json<Vec<MeetingRow>>, AppError> {
    require_permission(&actor, Permission::ViewMeetings)?;

    Ok(Json(meetings::list_meetings(&state.pool).await?))
}

/// GET /api/admin/meetings/{id}
pub async fn get_meeting(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(meeting_id): Path<String>,
) -> Result<Json<MeetingRow>, AppError> {
    require_permission(&actor, Permission::ViewMeetings)?;

    meetings::get_meeting(&state.pool, &meeting_id)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound("Meeting"))
}

/// POST /api/admin/meetings
pub async fn create_meeting(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Json(input): Json<CreateMeetingInput>,
) -> Result<(StatusCode, Json<MeetingRow>), AppError> {
    require_permission(&actor, Permission::CreateMeetings)?;

    input.validate()?;

    let meeting = NewMeeting {
        id: Ulid::new().to_string(),
        title: input.title,
        agenda: input.agenda,
        location: input.location,
        starts_at: input.starts_at,
        created_by: actor.id.clone(),
    };
    meetings::insert_meeting(&state.pool, &meeting).await?;

    info!(actor_id = %actor.id, meeting_id = %meeting.id, "meeting created");

    let created = meetings::get_meeting(&state.pool, &meeting.id)
        .await?
        .ok_or(AppError::NotFound("Meeting"))?;

    Ok((StatusCode::CREATED, Json(created)))
}

/// PATCH /api/admin/meetings/{id}
pub async fn update_meeting(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(meeting_id): Path<String>,
    Json(input): Json<UpdateMeetingInput>,
) -> Result<Json<MeetingRow>, AppError> {
    require_permission(&actor, Permission::EditMeetings)?;

    let update = MeetingUpdate {
        title: input.title,
        agenda: input.agenda,
        location: input.location,
        starts_at: input.starts_at,
        notes: input.notes,
    };

    if !meetings::update_meeting(&state.pool, &meeting_id, &update).await? {
        return Err(AppError::NotFound("Meeting"));
    }

    meetings::get_meeting(&state.pool, &meeting_id)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound("Meeting"))
}

/// DELETE /api/admin/meetings/{id}
pub async fn delete_meeting(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(meeting_id): Path<String>,
) -> Result<StatusCode, AppError> {
    require_permission(&actor, Permission::DeleteMeetings)?;

    if !meetings::delete_meeting(&state.pool, &meeting_id).await? {
        return Err(AppError::NotFound("Meeting"));
    }

    Ok(StatusCode::NO_CONTENT)
}
