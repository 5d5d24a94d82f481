//! Public contact form

use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{info, warn};
use ulid::Ulid;
use validator::Validate;

use crate::error::AppError;
use crate::queries::messages::insert_message;

use super::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct ContactInput {
    #[validate(length(min = 1, max = 100, message = "Name must be between 1 and 100 characters"))]
    pub name: String,
    #[validate(email(message = "Email must be a valid address"))]
    pub email: String,
    #[validate(length(
        min = 1,
        max = 200,
        message = "Subject must be between 1 and 200 characters"
    ))]
    pub subject: String,
    #[validate(length(
        min = 10,
        max = 5000,
        message = "Message must be between 10 and 5000 characters"
    ))]
    pub message: String,
}

/// POST /api/contact - store a visitor message and notify the organizers
///
/// The notification email is best-effort and happens off the request path;
/// the submission succeeds as soon as the row is stored.
pub async fn post_contact(
    State(state): State<AppState>,
    Json(input): Json<ContactInput>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    input.validate()?;

    let id = Ulid::new().to_string();
    insert_message(
        &state.pool,
        &id,
        &input.name,
        &input.email,
        &input.subject,
        &input.message,
    )
    .await?;

    info!(message_id = %id, "contact message stored");

    let email_service = state.email.clone();
    tokio::task::spawn_blocking(move || {
        if let Err(e) = email_service.send_contact_notification(
            &input.name,
            &input.email,
            &input.subject,
            &input.message,
        ) {
            warn!(error = %e, "failed to send contact notification email");
        }
    });

    Ok((StatusCode::CREATED, Json(json!({"id": id}))))
}
