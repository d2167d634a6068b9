use axum::{extract::State, Json};
use serde::Deserialize;

use super::AppState;
use crate::{
    error::Result,
    models::{ApiResponse, RedemptionReport},
};

#[derive(Debug, Deserialize)]
pub struct RedeemRequest {
    pub cdk: String,
    /// Selected rows at the moment the button was pressed.
    #[serde(default)]
    pub fids: Vec<String>,
}

/// POST /api/v1/redeem
///
/// Answers once the whole batch is done; progress is visible meanwhile on
/// `/ws/roster` and `/api/v1/players`. The batch keeps running if the caller
/// disconnects.
pub async fn redeem_code(
    State(state): State<AppState>,
    Json(req): Json<RedeemRequest>,
) -> Result<Json<ApiResponse<RedemptionReport>>> {
    let report = state
        .workflow
        .clone()
        .redeem_detached(req.cdk, req.fids)
        .await?;
    tracing::info!(
        "Batch {} finished: {} succeeded, {} failed",
        report.cdk,
        report.succeeded,
        report.failed
    );
    Ok(Json(ApiResponse::success(report)))
}
