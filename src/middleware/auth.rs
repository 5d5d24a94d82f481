//! Session middleware for the admin surface

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::CookieJar;
use tracing::warn;

use crate::auth::current_user;
use crate::error::AppError;
use crate::routes::AppState;

/// Require a valid session for everything below this layer.
///
/// Resolves the principal once and stashes it in the request extensions for
/// the handlers' `CurrentUser` extractor. Missing, expired and tampered
/// tokens are indistinguishable to the client: all end in the same 401.
/// Fine-grained permission checks stay in the handlers.
pub async fn require_session(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let Some(principal) = current_user(&jar, &state.config) else {
        warn!(
            path = %request.uri().path(),
            "unauthenticated request to admin surface"
        );
        return Err(AppError::Unauthenticated);
    };

    request.extensions_mut().insert(principal);

    Ok(next.run(request).await)
}
