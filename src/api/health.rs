use axum::{extract::State, Json};
use serde::Serialize;

use super::AppState;
use crate::constants::API_VERSION;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub api_version: String,
    pub environment: String,
    pub store: String,
    pub players: usize,
}

pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        api_version: API_VERSION.to_string(),
        environment: state.config.environment.clone(),
        store: state.store_backend.to_string(),
        players: state.roster.len().await,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_support::state_with;
    use crate::integrations::testing::ScriptedGiftCodeApi;

    #[tokio::test]
    async fn health_reports_store_and_roster_size() {
        let (state, _) = state_with(ScriptedGiftCodeApi::new()).await;
        let Json(health) = health_check(State(state)).await;
        assert_eq!(health.status, "ok");
        assert_eq!(health.store, "memory");
        assert_eq!(health.players, 0);
    }
}
