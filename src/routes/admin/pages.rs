//! Page-visibility management route handlers

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use tracing::{info, warn};

use crate::auth::permissions::{require_permission, Permission};
use crate::auth::CurrentUser;
use crate::error::AppError;
use crate::queries::activity::record_activity;
use crate::queries::pages::{self, PageRow};
use crate::routes::AppState;

#[derive(Debug, Deserialize)]
pub struct PageVisibilityInput {
    pub visible: bool,
}

/// GET /api/admin/pages
pub async fn list_pages(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
) -> Result<Json<Vec<PageRow>>, AppError> {
    require_permission(&actor, Permission::ManagePages)?;

    Ok(Json(pages::list_pages(&state.pool).await?))
}

/// PUT /api/admin/pages/{slug} - show or hide a public page
pub async fn set_page_visibility(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(slug): Path<String>,
    Json(input): Json<PageVisibilityInput>,
) -> Result<Json<Vec<PageRow>>, AppError> {
    require_permission(&actor, Permission::ManagePages)?;

    if !pages::set_page_visibility(&state.pool, &slug, input.visible, &actor.id).await? {
        return Err(AppError::NotFound("Page"));
    }

    info!(
        actor_id = %actor.id,
        slug = %slug,
        visible = input.visible,
        "page visibility changed"
    );

    if let Err(e) = record_activity(
        &state.pool,
        &actor,
        "page.visibility",
        Some("page"),
        Some(&slug),
        Some(format!("visible={}", input.visible)),
    )
    .await
    {
        warn!(error = %e, "failed to record activity");
    }

    Ok(Json(pages::list_pages(&state.pool).await?))
}
