//! Admin back-office JSON API.
//!
//! Everything in here sits behind the session middleware; each handler then
//! checks its own fine-grained permission through the authorization gate.

pub mod activity;
pub mod files;
pub mod meetings;
pub mod messages;
pub mod pages;
pub mod tasks;
pub mod users;

use axum::{
    routing::{delete, get, put},
    Router,
};

use super::{admin_layer, AppState};

pub fn admin_router(state: AppState) -> Router<AppState> {
    let routes = Router::new()
        .route("/users", get(users::list_users).post(users::create_user))
        .route(
            "/users/{id}",
            get(users::get_user).patch(users::update_user).delete(users::delete_user),
        )
        .route("/messages", get(messages::list_messages))
        .route(
            "/messages/{id}",
            get(messages::get_message)
                .patch(messages::update_message_status)
                .delete(messages::delete_message),
        )
        .route("/tasks", get(tasks::list_tasks).post(tasks::create_task))
        .route(
            "/tasks/{id}",
            get(tasks::get_task).patch(tasks::update_task).delete(tasks::delete_task),
        )
        .route(
            "/meetings",
            get(meetings::list_meetings).post(meetings::create_meeting),
        )
        .route(
            "/meetings/{id}",
            get(meetings::get_meeting)
                .patch(meetings::update_meeting)
                .delete(meetings::delete_meeting),
        )
        .route("/files", get(files::list_files).post(files::create_file))
        .route("/files/{id}", delete(files::delete_file))
        .route("/activity", get(activity::list_activity))
        .route("/pages", get(pages::list_pages))
        .route("/pages/{slug}", put(pages::set_page_visibility));

    admin_layer(state, routes)
}
