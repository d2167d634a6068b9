use axum::{extract::State, Json};

use super::AppState;
use crate::{models::ApiResponse, services::ErrorNotice};

/// GET /api/v1/notice
pub async fn get_notice(State(state): State<AppState>) -> Json<ApiResponse<Option<ErrorNotice>>> {
    Json(ApiResponse::success(state.notices.active().await))
}

/// DELETE /api/v1/notice
pub async fn dismiss_notice(State(state): State<AppState>) -> Json<ApiResponse<Option<ErrorNotice>>> {
    state.notices.dismiss().await;
    Json(ApiResponse::success(None))
}
