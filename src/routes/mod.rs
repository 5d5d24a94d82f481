pub mod admin;
pub mod auth;
pub mod contact;
pub mod health;
pub mod pages;

use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use sqlx::SqlitePool;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::email::EmailService;
use crate::middleware::require_session;

/// Shared application state.
///
/// Everything here is cheaply cloneable; there is no other process-wide
/// mutable state, so request handling stays race-free by construction.
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub config: Config,
    pub email: EmailService,
}

/// Build the full application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/ready", get(health::ready))
        .route("/api/auth/login", post(auth::post_login))
        .route("/api/auth/logout", post(auth::post_logout))
        .route("/api/auth/me", get(auth::get_me))
        .route("/api/contact", post(contact::post_contact))
        .route("/api/pages", get(pages::get_pages))
        .nest("/api/admin", admin::admin_router(state.clone()))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Assemble the admin sub-router behind the session middleware.
pub(crate) fn admin_layer(state: AppState, routes: Router<AppState>) -> Router<AppState> {
    routes.route_layer(axum_middleware::from_fn_with_state(state, require_session))
}
