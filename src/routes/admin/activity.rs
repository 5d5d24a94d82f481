//! Activity-log route handlers

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use crate::auth::permissions::{require_permission, Permission};
use crate::auth::CurrentUser;
use crate::error::AppError;
use crate::queries::activity::{self, ActivityRow};
use crate::routes::AppState;

const DEFAULT_LIMIT: i64 = 100;
const MAX_LIMIT: i64 = 500;

#[derive(Debug, Deserialize)]
pub struct ActivityQuery {
    pub limit: Option<i64>,
}

/// GET /api/admin/activity - most recent audit entries first
pub async fn list_activity(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Query(query): Query<ActivityQuery>,
) -> Result<Json<Vec<ActivityRow>>, AppError> {
    require_permission(&actor, Permission::ViewActivity)?;

    let limit = query.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);

    Ok(Json(activity::list_activity(&state.pool, limit).await?))
}
