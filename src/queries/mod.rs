//! Plain sqlx query functions, one module per table.

pub mod activity;
pub mod files;
pub mod meetings;
pub mod messages;
pub mod pages;
pub mod tasks;
pub mod users;

/// Whether a database error is a UNIQUE constraint violation, so callers can
/// answer 409 instead of 500.
pub fn is_unique_violation(error: &sqlx::Error) -> bool {
    error
        .as_database_error()
        .is_some_and(|db| matches!(db.kind(), sqlx::error::ErrorKind::UniqueViolation))
}
