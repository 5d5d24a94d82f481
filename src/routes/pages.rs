//! Public page-visibility map, consumed by the site navigation

use axum::{extract::State, Json};
use serde_json::{Map, Value};

use crate::error::AppError;
use crate::queries::pages::list_pages;

use super::AppState;

/// GET /api/pages - slug → visible map for the public site
pub async fn get_pages(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let pages = list_pages(&state.pool).await?;

    let map: Map<String, Value> = pages
        .into_iter()
        .map(|page| (page.slug, Value::Bool(page.visible)))
        .collect();

    Ok(Json(Value::Object(map)))
}
