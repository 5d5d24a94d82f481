//! Session authentication and role-based access control.
//!
//! The signed session token is the sole source of truth for a session: there
//! is no server-side session store, and resolving the current principal never
//! touches the database. All resolution failures (missing cookie, expired or
//! tampered token) collapse into the same anonymous outcome.

pub mod lockout;
pub mod password;
pub mod permissions;
pub mod session;
pub mod token;

use serde::Serialize;
use thiserror::Error;

pub use lockout::{calculate_lock_expiry, is_account_locked, MAX_FAILED_LOGINS};
pub use permissions::{
    can_access_tab, can_manage_role, has_permission, require_permission, role_permissions,
    user_has_permission, Permission, Role,
};
pub use session::{
    build_session_cookie, current_user, is_authenticated, remove_session_cookie, CurrentUser,
    MaybeUser, SESSION_COOKIE_NAME,
};
pub use token::{generate_token, verify_token, Claims, SESSION_TTL_SECS};

/// The authenticated identity carried by a verified session token.
///
/// `role` stays a string here because it crosses the wire; it is parsed into
/// [`permissions::Role`] at every authorization decision, and an unknown
/// string simply grants nothing.
#[derive(Debug, Clone, Serialize)]
pub struct Principal {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: String,
}

impl From<Claims> for Principal {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.sub,
            email: claims.email,
            name: claims.name,
            role: claims.role,
        }
    }
}

/// Failures inside the crypto primitives. These are unexpected (corrupt hash
/// in the database, signing failure) and map to 500, never to 401.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("password hashing failed: {0}")]
    Hashing(String),

    #[error("token signing failed: {0}")]
    TokenSigning(String),
}
