//! File-manager route handlers.
//!
//! Only metadata is managed here; the bytes themselves live on the external
//! media host and are referenced by URL.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use tracing::{info, warn};
use ulid::Ulid;
use validator::Validate;

use crate::auth::permissions::{require_permission, Permission};
use crate::auth::CurrentUser;
use crate::error::AppError;
use crate::queries::activity::record_activity;
use crate::queries::files::{self, FileRow, NewFile};
use crate::routes::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateFileInput {
    #[validate(length(min = 1, max = 255, message = "Name must be between 1 and 255 characters"))]
    pub name: String,
    #[validate(url(message = "Url must be a valid URL"))]
    pub url: String,
    pub content_type: Option<String>,
    pub size_bytes: Option<i64>,
}

/// GET /api/admin/files
pub async fn list_files(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
) -> Result<Json<Vec<FileRow>>, AppError> {
    require_permission(&actor, Permission::ViewFiles)?;

    Ok(Json(files::list_files(&state.pool).await?))
}

/// POST /api/admin/files - record an upload completed on the media host
pub async fn create_file(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Json(input): Json<CreateFileInput>,
) -> Result<(StatusCode, Json<FileRow>), AppError> {
    require_permission(&actor, Permission::UploadFiles)?;

    input.validate()?;

    let file = NewFile {
        id: Ulid::new().to_string(),
        name: input.name,
        url: input.url,
        content_type: input.content_type,
        size_bytes: input.size_bytes,
        uploaded_by: actor.id.clone(),
    };
    files::insert_file(&state.pool, &file).await?;

    info!(actor_id = %actor.id, file_id = %file.id, "file metadata recorded");

    let created = files::get_file(&state.pool, &file.id)
        .await?
        .ok_or(AppError::NotFound("File"))?;

    Ok((StatusCode::CREATED, Json(created)))
}

/// DELETE /api/admin/files/{id}
///
/// Removes the metadata record only; deleting the object on the media host
/// is the operator's separate step.
pub async fn delete_file(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(file_id): Path<String>,
) -> Result<StatusCode, AppError> {
    require_permission(&actor, Permission::DeleteFiles)?;

    if !files::delete_file(&state.pool, &file_id).await? {
        return Err(AppError::NotFound("File"));
    }

    if let Err(e) = record_activity(
        &state.pool,
        &actor,
        "file.delete",
        Some("file"),
        Some(&file_id),
        None,
    )
    .await
    {
        warn!(error = %e, "failed to record activity");
    }

    Ok(StatusCode::NO_CONTENT)
}
