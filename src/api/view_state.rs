use axum::{extract::State, Json};

use super::AppState;
use crate::{
    error::Result,
    models::{ApiResponse, ViewSnapshot},
};

/// GET /api/v1/view-state
pub async fn get_view_state(State(state): State<AppState>) -> Json<ApiResponse<ViewSnapshot>> {
    Json(ApiResponse::success(state.view_state.capture().await))
}

/// PUT /api/v1/view-state
///
/// Held in memory only; written out on unload or shutdown.
pub async fn put_view_state(
    State(state): State<AppState>,
    Json(snapshot): Json<ViewSnapshot>,
) -> Json<ApiResponse<ViewSnapshot>> {
    state.view_state.replace(snapshot.clone()).await;
    Json(ApiResponse::success(snapshot))
}

/// POST /api/v1/view-state/unload
pub async fn unload(State(state): State<AppState>) -> Result<Json<ApiResponse<ViewSnapshot>>> {
    let saved = state.view_state.persist_current().await?;
    Ok(Json(ApiResponse::success(saved)))
}
