//! files table queries (metadata only; bytes live on the media host)

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::SqlitePool;

#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct FileRow {
    pub id: String,
    pub name: String,
    pub url: String,
    pub content_type: Option<String>,
    pub size_bytes: Option<i64>,
    pub uploaded_by: String,
    pub created_at: DateTime<Utc>,
}

pub struct NewFile {
    pub id: String,
    pub name: String,
    pub url: String,
    pub content_type: Option<String>,
    pub size_bytes: Option<i64>,
    pub uploaded_by: String,
}

pub async fn insert_file(pool: &SqlitePool, file: &NewFile) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO files (id, name, url, content_type, size_bytes, uploaded_by, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
    )
    .bind(&file.id)
    .bind(&file.name)
    .bind(&file.url)
    .bind(&file.content_type)
    .bind(file.size_bytes)
    .bind(&file.uploaded_by)
    .bind(Utc::now())
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn list_files(pool: &SqlitePool) -> Result<Vec<FileRow>, sqlx::Error> {
    sqlx::query_as(
        "SELECT id, name, url, content_type, size_bytes, uploaded_by, created_at
         FROM files ORDER BY created_at DESC",
    )
    .fetch_all(pool)
    .await
}

pub async fn get_file(pool: &SqlitePool, id: &str) -> Result<Option<FileRow>, sqlx::Error> {
    sqlx::query_as(
        "SELECT id, name, url, content_type, size_bytes, uploaded_by, created_at
         FROM files WHERE id = ?1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn delete_file(pool: &SqlitePool, id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM files WHERE id = ?1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
