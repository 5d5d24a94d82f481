//! Session cookie adapter and authentication context resolver

use std::convert::Infallible;

use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::{
    cookie::{Cookie, SameSite},
    CookieJar,
};

use crate::config::Config;
use crate::error::AppError;
use crate::routes::AppState;

use super::token::{verify_token, SESSION_TTL_SECS};
use super::Principal;

/// The single session cookie. Everything about the session travels in it.
pub const SESSION_COOKIE_NAME: &str = "admin_session";

/// Build the session cookie carrying a freshly signed token.
/// `Secure` only in production so local development over plain HTTP works.
pub fn build_session_cookie<'a>(token: String, secure: bool) -> Cookie<'a> {
    Cookie::build((SESSION_COOKIE_NAME, token))
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::seconds(SESSION_TTL_SECS as i64))
        .build()
}

/// Remove the session cookie. Removing an absent cookie is a no-op.
pub fn remove_session_cookie(jar: CookieJar) -> CookieJar {
    jar.remove(Cookie::build(SESSION_COOKIE_NAME).path("/"))
}

/// Resolve the current principal from the request's cookie jar.
///
/// No cookie means anonymous and no verification is attempted. A cookie that
/// fails verification for any reason (expired, tampered, malformed) is the
/// same anonymous outcome; callers cannot tell the cases apart. Never fails.
pub fn current_user(jar: &CookieJar, config: &Config) -> Option<Principal> {
    let token = jar.get(SESSION_COOKIE_NAME)?;
    let claims = verify_token(token.value(), &config.jwt.secret)?;
    Some(Principal::from(claims))
}

/// Whether the request carries a valid session.
pub fn is_authenticated(jar: &CookieJar, config: &Config) -> bool {
    current_user(jar, config).is_some()
}

/// Extractor for handlers that require a session. Rejects anonymous requests
/// with the uniform authentication error (401).
pub struct CurrentUser(pub Principal);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // The admin middleware resolves once and stashes the principal
        if let Some(principal) = parts.extensions.get::<Principal>() {
            return Ok(CurrentUser(principal.clone()));
        }

        let jar = CookieJar::from_headers(&parts.headers);
        current_user(&jar, &state.config)
            .map(CurrentUser)
            .ok_or(AppError::Unauthenticated)
    }
}

/// Extractor for handlers that serve both anonymous and authenticated
/// visitors. Never rejects.
pub struct MaybeUser(pub Option<Principal>);

impl FromRequestParts<AppState> for MaybeUser {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(principal) = parts.extensions.get::<Principal>() {
            return Ok(MaybeUser(Some(principal.clone())));
        }

        let jar = CookieJar::from_headers(&parts.headers);
        Ok(MaybeUser(current_user(&jar, &state.config)))
    }
}
