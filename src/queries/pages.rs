//! page_settings table queries

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::SqlitePool;

#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct PageRow {
    pub slug: String,
    pub visible: bool,
    pub updated_by: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

pub async fn list_pages(pool: &SqlitePool) -> Result<Vec<PageRow>, sqlx::Error> {
    sqlx::query_as("SELECT slug, visible, updated_by, updated_at FROM page_settings ORDER BY slug")
        .fetch_all(pool)
        .await
}

/// Flip visibility for a known page. Returns false for unknown slugs; the
/// set of pages is fixed by migration, not created through the API.
pub async fn set_page_visibility(
    pool: &SqlitePool,
    slug: &str,
    visible: bool,
    updated_by: &str,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE page_settings SET visible = ?1, updated_by = ?2, updated_at = ?3 WHERE slug = ?4",
    )
    .bind(visible)
    .bind(updated_by)
    .bind(Utc::now())
    .bind(slug)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}
