//! Login, logout and session introspection

use axum::{extract::State, http::StatusCode, Json};
use axum_extra::extract::CookieJar;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::auth::permissions::accessible_tabs;
use crate::auth::{
    build_session_cookie, calculate_lock_expiry, generate_token, is_account_locked,
    remove_session_cookie, CurrentUser, Principal, MAX_FAILED_LOGINS,
};
use crate::error::AppError;
use crate::queries::activity::record_activity;
use crate::queries::users::{
    get_credentials_by_email, record_login_failure, record_login_success,
};

use super::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

/// POST /api/auth/login
///
/// Unknown email, wrong password and deactivated account all answer with the
/// same 401 body; only the lockout state is distinguishable (423), because
/// "come back later" is actionable and not a secret.
pub async fn post_login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(input): Json<LoginInput>,
) -> Result<(CookieJar, Json<Value>), AppError> {
    let Some(user) = get_credentials_by_email(&state.pool, &input.email).await? else {
        info!(email = %input.email, "login attempt for unknown email");
        return Err(AppError::InvalidCredentials);
    };

    if is_account_locked(user.failed_login_attempts, user.locked_until) {
        warn!(user_id = %user.id, "login attempt against locked account");
        return Err(AppError::AccountLocked);
    }

    if !user.is_active {
        warn!(user_id = %user.id, "login attempt against deactivated account");
        return Err(AppError::InvalidCredentials);
    }

    if !crate::auth::password::verify_password(&input.password, &user.password_hash)? {
        let attempts = user.failed_login_attempts + 1;
        let locked_until = (attempts >= MAX_FAILED_LOGINS).then(calculate_lock_expiry);
        if locked_until.is_some() {
            warn!(user_id = %user.id, attempts, "account locked after repeated failures");
        }
        record_login_failure(&state.pool, &user.id, attempts, locked_until).await?;
        return Err(AppError::InvalidCredentials);
    }

    record_login_success(&state.pool, &user.id).await?;

    let token = generate_token(
        &user.id,
        &user.email,
        &user.name,
        &user.role,
        &state.config.jwt.secret,
    )?;
    let jar = jar.add(build_session_cookie(token, state.config.is_production()));

    let principal = Principal {
        id: user.id,
        email: user.email,
        name: user.name,
        role: user.role,
    };

    if let Err(e) = record_activity(&state.pool, &principal, "login", None, None, None).await {
        warn!(error = %e, "failed to record login activity");
    }

    info!(user_id = %principal.id, "user logged in");

    let tabs = accessible_tabs(&principal);
    Ok((jar, Json(json!({"user": principal, "tabs": tabs}))))
}

/// POST /api/auth/logout
///
/// Removes the session cookie. Idempotent: logging out without a session is
/// still a 204.
pub async fn post_logout(jar: CookieJar) -> (CookieJar, StatusCode) {
    (remove_session_cookie(jar), StatusCode::NO_CONTENT)
}

/// GET /api/auth/me - current principal and the admin tabs it may open
pub async fn get_me(CurrentUser(principal): CurrentUser) -> Json<Value> {
    let tabs = accessible_tabs(&principal);
    Json(json!({"user": principal, "tabs": tabs}))
}
