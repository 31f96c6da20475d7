use axum::{
    extract::{Path, State},
    Extension, Json,
};
use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    middleware::RequestId,
    models::Dish,
};

use super::AppState;

/// Lists the full catalog in id order
pub async fn list(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
) -> AppResult<Json<Vec<Dish>>> {
    let catalog = state.catalog.load().await?;

    tracing::info!(
        request_id = %request_id,
        provider = state.catalog.name(),
        count = catalog.len(),
        loaded_at = %catalog.loaded_at(),
        "Listing dishes"
    );

    Ok(Json(catalog.dishes().to_vec()))
}

pub async fn get(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Path(id): Path<i64>,
) -> AppResult<Json<Dish>> {
    let catalog = state.catalog.load().await?;

    tracing::info!(request_id = %request_id, dish_id = id, "Fetching dish");

    catalog
        .get(id)
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Dish {id} not found")))
}
