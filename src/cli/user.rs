//! Operator commands for principal administration.
//!
//! These run with direct database access and therefore outside the HTTP
//! authorization gate; trust is the shell, not the role tiers.

use clap::ValueEnum;
use ulid::Ulid;

use crate::auth::password::{hash_password, validate_email, validate_password};
use crate::auth::permissions::Role;
use crate::config::Config;
use crate::queries::users::{get_user_by_email, insert_user, update_user, AdminUserUpdate, NewAdminUser};

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RoleArg {
    Viewer,
    Moderator,
    Admin,
    SuperAdmin,
}

impl RoleArg {
    fn as_role(self) -> Role {
        match self {
            RoleArg::Viewer => Role::Viewer,
            RoleArg::Moderator => Role::Moderator,
            RoleArg::Admin => Role::Admin,
            RoleArg::SuperAdmin => Role::SuperAdmin,
        }
    }
}

/// Create a back-office principal. There is no public signup; this is how
/// the first super_admin comes to exist.
pub async fn create(
    config: Config,
    email: String,
    name: String,
    role: RoleArg,
    password: String,
) -> anyhow::Result<()> {
    if !validate_email(&email) {
        anyhow::bail!("invalid email address: {email}");
    }

    let check = validate_password(&password);
    if !check.valid {
        anyhow::bail!("password rejected:\n  - {}", check.errors.join("\n  - "));
    }

    let pool = crate::db::create_pool(&config.database.url, 1).await?;

    if get_user_by_email(&pool, &email).await?.is_some() {
        anyhow::bail!("user {email} already exists");
    }

    let user = NewAdminUser {
        id: Ulid::new().to_string(),
        email: email.clone(),
        name,
        role: role.as_role().to_string(),
        password_hash: hash_password(&password)?,
    };
    insert_user(&pool, &user).await?;

    tracing::info!(user_id = %user.id, email = %email, role = %user.role, "admin user created");

    Ok(())
}

/// Change a principal's role by email.
pub async fn set_role(config: Config, email: String, role: RoleArg) -> anyhow::Result<()> {
    let pool = crate::db::create_pool(&config.database.url, 1).await?;

    let Some(user) = get_user_by_email(&pool, &email).await? else {
        tracing::error!("user {email} not found");
        return Ok(());
    };

    let update = AdminUserUpdate {
        role: Some(role.as_role().to_string()),
        ..AdminUserUpdate::default()
    };
    update_user(&pool, &user.id, &update).await?;

    tracing::info!(user_id = %user.id, role = %role.as_role(), "role updated");

    Ok(())
}
