//! Admin user management route handlers.
//!
//! Two rules apply on top of the permission flags and cannot be bypassed by
//! them: a principal only manages (changes the role of, deletes) principals
//! of strictly lower tier, and no principal deactivates itself.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use tracing::{info, warn};
use ulid::Ulid;
use validator::Validate;

use crate::auth::permissions::{can_manage_role, require_permission, Permission, Role};
use crate::auth::{password, CurrentUser};
use crate::error::AppError;
use crate::queries::activity::record_activity;
use crate::queries::users::{
    self, AdminUserRow, AdminUserUpdate, NewAdminUser,
};
use crate::queries::is_unique_violation;
use crate::routes::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserInput {
    #[validate(email(message = "Email must be a valid address"))]
    pub email: String,
    #[validate(length(min = 1, max = 100, message = "Name must be between 1 and 100 characters"))]
    pub name: String,
    pub role: String,
    pub password: String,
}

#[derive(Debug, Deserialize, Default)]
pub struct UpdateUserInput {
    pub email: Option<String>,
    pub name: Option<String>,
    pub role: Option<String>,
    pub is_active: Option<bool>,
    pub email_verified: Option<bool>,
    pub password: Option<String>,
}

/// GET /api/admin/users
pub async fn list_users(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
) -> Result<Json<Vec<AdminUserRow>>, AppError> {
    require_permission(&actor, Permission::ViewUsers)?;

    Ok(Json(users::list_users(&state.pool).await?))
}

/// GET /api/admin/users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(user_id): Path<String>,
) -> Result<Json<AdminUserRow>, AppError> {
    require_permission(&actor, Permission::ViewUsers)?;

    users::get_user(&state.pool, &user_id)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound("User"))
}

/// POST /api/admin/users
///
/// The strictly-lower-tier rule applies to the role being assigned as well:
/// minting an account at or above one's own tier would be escalation.
pub async fn create_user(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Json(input): Json<CreateUserInput>,
) -> Result<(StatusCode, Json<AdminUserRow>), AppError> {
    require_permission(&actor, Permission::CreateUsers)?;

    input.validate()?;

    if Role::parse(&input.role).is_none() {
        return Err(AppError::Validation(vec![format!(
            "Unknown role: {}",
            input.role
        )]));
    }
    if !can_manage_role(&actor.role, &input.role) {
        warn!(
            actor_id = %actor.id,
            actor_role = %actor.role,
            requested_role = %input.role,
            "attempt to create a user at or above own tier"
        );
        return Err(AppError::PermissionDenied(Permission::CreateUsers));
    }

    let check = password::validate_password(&input.password);
    if !check.valid {
        return Err(AppError::Validation(
            check.errors.iter().map(|e| e.to_string()).collect(),
        ));
    }

    let new_user = NewAdminUser {
        id: Ulid::new().to_string(),
        email: input.email,
        name: input.name,
        role: input.role,
        password_hash: password::hash_password(&input.password)?,
    };

    if let Err(e) = users::insert_user(&state.pool, &new_user).await {
        if is_unique_violation(&e) {
            return Err(AppError::Conflict("Email already exists".to_string()));
        }
        return Err(e.into());
    }

    info!(actor_id = %actor.id, user_id = %new_user.id, "admin user created");

    if let Err(e) = record_activity(
        &state.pool,
        &actor,
        "user.create",
        Some("user"),
        Some(&new_user.id),
        Some(format!("role={}", new_user.role)),
    )
    .await
    {
        warn!(error = %e, "failed to record activity");
    }

    let created = users::get_user(&state.pool, &new_user.id)
        .await?
        .ok_or(AppError::NotFound("User"))?;

    Ok((StatusCode::CREATED, Json(created)))
}

/// PATCH /api/admin/users/{id}
pub async fn update_user(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(user_id): Path<String>,
    Json(input): Json<UpdateUserInput>,
) -> Result<Json<AdminUserRow>, AppError> {
    require_permission(&actor, Permission::EditUsers)?;

    let target = users::get_user(&state.pool, &user_id)
        .await?
        .ok_or(AppError::NotFound("User"))?;

    // Role changes are managing the target: both its current tier and the
    // requested tier must sit strictly below the actor's.
    if let Some(new_role) = &input.role {
        if Role::parse(new_role).is_none() {
            return Err(AppError::Validation(vec![format!(
                "Unknown role: {new_role}"
            )]));
        }
        if !can_manage_role(&actor.role, &target.role) || !can_manage_role(&actor.role, new_role) {
            warn!(
                actor_id = %actor.id,
                target_id = %target.id,
                target_role = %target.role,
                requested_role = %new_role,
                "role change rejected by tier rule"
            );
            return Err(AppError::PermissionDenied(Permission::EditUsers));
        }
    }

    // Self-deactivation guard: an account cannot switch itself off.
    if input.is_active == Some(false) && actor.id == target.id {
        return Err(AppError::Validation(vec![
            "Cannot deactivate your own account".to_string(),
        ]));
    }

    let mut fields = AdminUserUpdate {
        email: input.email,
        name: input.name,
        role: input.role,
        is_active: input.is_active,
        email_verified: input.email_verified,
        password_hash: None,
    };

    if let Some(email) = &fields.email {
        if !password::validate_email(email) {
            return Err(AppError::Validation(vec![
                "Email must be a valid address".to_string(),
            ]));
        }
    }

    if let Some(new_password) = &input.password {
        let check = password::validate_password(new_password);
        if !check.valid {
            return Err(AppError::Validation(
                check.errors.iter().map(|e| e.to_string()).collect(),
            ));
        }
        fields.password_hash = Some(password::hash_password(new_password)?);
    }

    if fields.is_empty() {
        return Err(AppError::Validation(vec![
            "No fields to update".to_string(),
        ]));
    }

    if let Err(e) = users::update_user(&state.pool, &user_id, &fields).await {
        if is_unique_violation(&e) {
            return Err(AppError::Conflict("Email already exists".to_string()));
        }
        return Err(e.into());
    }

    if let Err(e) = record_activity(
        &state.pool,
        &actor,
        "user.update",
        Some("user"),
        Some(&user_id),
        None,
    )
    .await
    {
        warn!(error = %e, "failed to record activity");
    }

    users::get_user(&state.pool, &user_id)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound("User"))
}

/// DELETE /api/admin/users/{id}
///
/// Only a strictly higher tier may delete, which also rules out
/// self-deletion (equal tier).
pub async fn delete_user(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(user_id): Path<String>,
) -> Result<StatusCode, AppError> {
    require_permission(&actor, Permission::DeleteUsers)?;

    let target = users::get_user(&state.pool, &user_id)
        .await?
        .ok_or(AppError::NotFound("User"))?;

    if !can_manage_role(&actor.role, &target.role) {
        warn!(
            actor_id = %actor.id,
            target_id = %target.id,
            target_role = %target.role,
            "user deletion rejected by tier rule"
        );
        return Err(AppError::PermissionDenied(Permission::DeleteUsers));
    }

    users::delete_user(&state.pool, &user_id).await?;

    info!(actor_id = %actor.id, user_id = %user_id, "admin user deleted");

    if let Err(e) = record_activity(
        &state.pool,
        &actor,
        "user.delete",
        Some("user"),
        Some(&user_id),
        Some(format!("email={}", target.email)),
    )
    .await
    {
        warn!(error = %e, "failed to record activity");
    }

    Ok(StatusCode::NO_CONTENT)
}
