//! admin_users table queries

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{QueryBuilder, SqlitePool};

/// Principal row as exposed to the admin UI. Never carries the hash.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct AdminUserRow {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: String,
    pub is_active: bool,
    pub email_verified: bool,
    pub last_login: Option<DateTime<Utc>>,
    pub failed_login_attempts: i64,
    pub locked_until: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Row shape used only by the login path.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CredentialRow {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: String,
    pub password_hash: String,
    pub is_active: bool,
    pub failed_login_attempts: i64,
    pub locked_until: Option<DateTime<Utc>>,
}

pub struct NewAdminUser {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: String,
    pub password_hash: String,
}

/// Sparse partial update: only present fields are written. Compiled into a
/// parameterized statement, never interpolated into SQL text.
#[derive(Debug, Default)]
pub struct AdminUserUpdate {
    pub email: Option<String>,
    pub name: Option<String>,
    pub role: Option<String>,
    pub is_active: Option<bool>,
    pub email_verified: Option<bool>,
    pub password_hash: Option<String>,
}

impl AdminUserUpdate {
    pub fn is_empty(&self) -> bool {
        self.email.is_none()
            && self.name.is_none()
            && self.role.is_none()
            && self.is_active.is_none()
            && self.email_verified.is_none()
            && self.password_hash.is_none()
    }
}

const USER_COLUMNS: &str = "id, email, name, role, is_active, email_verified, last_login, \
     failed_login_attempts, locked_until, created_at, updated_at";

pub async fn get_user(pool: &SqlitePool, id: &str) -> Result<Option<AdminUserRow>, sqlx::Error> {
    sqlx::query_as(&format!(
        "SELECT {USER_COLUMNS} FROM admin_users WHERE id = ?1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn get_user_by_email(
    pool: &SqlitePool,
    email: &str,
) -> Result<Option<AdminUserRow>, sqlx::Error> {
    sqlx::query_as(&format!(
        "SELECT {USER_COLUMNS} FROM admin_users WHERE email = ?1"
    ))
    .bind(email)
    .fetch_optional(pool)
    .await
}

pub async fn get_credentials_by_email(
    pool: &SqlitePool,
    email: &str,
) -> Result<Option<CredentialRow>, sqlx::Error> {
    sqlx::query_as(
        "SELECT id, email, name, role, password_hash, is_active, failed_login_attempts, locked_until
         FROM admin_users WHERE email = ?1",
    )
    .bind(email)
    .fetch_optional(pool)
    .await
}

pub async fn list_users(pool: &SqlitePool) -> Result<Vec<AdminUserRow>, sqlx::Error> {
    sqlx::query_as(&format!(
        "SELECT {USER_COLUMNS} FROM admin_users ORDER BY created_at"
    ))
    .fetch_all(pool)
    .await
}

pub async fn insert_user(pool: &SqlitePool, user: &NewAdminUser) -> Result<(), sqlx::Error> {
    let now = Utc::now();
    sqlx::query(
        "INSERT INTO admin_users (id, email, password_hash, name, role, is_active, email_verified,
                                  failed_login_attempts, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, 1, 0, 0, ?6, ?7)",
    )
    .bind(&user.id)
    .bind(&user.email)
    .bind(&user.password_hash)
    .bind(&user.name)
    .bind(&user.role)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    Ok(())
}

/// Apply a sparse update. Returns false when no row matched.
pub async fn update_user(
    pool: &SqlitePool,
    id: &str,
    update: &AdminUserUpdate,
) -> Result<bool, sqlx::Error> {
    let mut builder = QueryBuilder::new("UPDATE admin_users SET updated_at = ");
    builder.push_bind(Utc::now());

    if let Some(email) = &update.email {
        builder.push(", email = ").push_bind(email);
    }
    if let Some(name) = &update.name {
        builder.push(", name = ").push_bind(name);
    }
    if let Some(role) = &update.role {
        builder.push(", role = ").push_bind(role);
    }
    if let Some(is_active) = update.is_active {
        builder.push(", is_active = ").push_bind(is_active);
    }
    if let Some(email_verified) = update.email_verified {
        builder.push(", email_verified = ").push_bind(email_verified);
    }
    if let Some(password_hash) = &update.password_hash {
        builder.push(", password_hash = ").push_bind(password_hash);
    }

    builder.push(" WHERE id = ").push_bind(id);

    let result = builder.build().execute(pool).await?;
    Ok(result.rows_affected() > 0)
}

pub async fn delete_user(pool: &SqlitePool, id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM admin_users WHERE id = ?1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Successful login: reset the failure counter, clear any lock, stamp
/// last_login.
pub async fn record_login_success(pool: &SqlitePool, id: &str) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE admin_users
         SET failed_login_attempts = 0, locked_until = NULL, last_login = ?1, updated_at = ?1
         WHERE id = ?2",
    )
    .bind(Utc::now())
    .bind(id)
    .execute(pool)
    .await?;

    Ok(())
}

/// Failed login: store the bumped counter and, once the threshold is hit,
/// the lock expiry computed by the caller.
pub async fn record_login_failure(
    pool: &SqlitePool,
    id: &str,
    failed_attempts: i64,
    locked_until: Option<DateTime<Utc>>,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE admin_users
         SET failed_login_attempts = ?1, locked_until = ?2, updated_at = ?3
         WHERE id = ?4",
    )
    .bind(failed_attempts)
    .bind(locked_until)
    .bind(Utc::now())
    .bind(id)
    .execute(pool)
    .await?;

    Ok(())
}
