use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use super::AppState;
use crate::{
    error::Result,
    models::{ApiResponse, Player},
    services::AddPlayerOutcome,
};

#[derive(Debug, Deserialize)]
pub struct AddPlayerRequest {
    pub fid: String,
}

#[derive(Debug, Serialize)]
pub struct AddPlayerResponse {
    pub added: bool,
    pub player: Player,
}

#[derive(Debug, Deserialize)]
pub struct RemovePlayersRequest {
    #[serde(default)]
    pub fids: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct RemovePlayersResponse {
    pub removed: usize,
    pub players: Vec<Player>,
}

/// GET /api/v1/players
pub async fn list_players(State(state): State<AppState>) -> Json<ApiResponse<Vec<Player>>> {
    Json(ApiResponse::success(state.roster.list().await))
}

/// POST /api/v1/players
pub async fn add_player(
    State(state): State<AppState>,
    Json(req): Json<AddPlayerRequest>,
) -> Result<Json<ApiResponse<AddPlayerResponse>>> {
    let response = match state.workflow.add_player(&req.fid).await? {
        AddPlayerOutcome::Added(player) => AddPlayerResponse {
            added: true,
            player,
        },
        AddPlayerOutcome::AlreadyTracked(player) => AddPlayerResponse {
            added: false,
            player,
        },
    };
    Ok(Json(ApiResponse::success(response)))
}

/// POST /api/v1/players/remove
pub async fn remove_players(
    State(state): State<AppState>,
    Json(req): Json<RemovePlayersRequest>,
) -> Json<ApiResponse<RemovePlayersResponse>> {
    let removed = state.workflow.remove_selected(req.fids).await;
    Json(ApiResponse::success(RemovePlayersResponse {
        removed,
        players: state.roster.list().await,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_support::state_with;
    use crate::error::AppError;
    use crate::integrations::{testing::ScriptedGiftCodeApi, LookupResult};

    #[tokio::test]
    async fn add_then_list_then_remove() {
        let (state, _) = state_with(ScriptedGiftCodeApi::new()).await;

        let Json(added) = add_player(
            State(state.clone()),
            Json(AddPlayerRequest { fid: "42".into() }),
        )
        .await
        .expect("add");
        assert!(added.data.added);
        assert_eq!(added.data.player.fid, "42");

        let Json(again) = add_player(
            State(state.clone()),
            Json(AddPlayerRequest { fid: "42".into() }),
        )
        .await
        .expect("add again");
        assert!(!again.data.added);

        let Json(listed) = list_players(State(state.clone())).await;
        assert_eq!(listed.data.len(), 1);

        let Json(removed) = remove_players(
            State(state.clone()),
            Json(RemovePlayersRequest {
                fids: vec!["42".into(), "7".into()],
            }),
        )
        .await;
        assert_eq!(removed.data.removed, 1);
        assert!(removed.data.players.is_empty());
    }

    #[tokio::test]
    async fn add_unknown_player_is_external_error() {
        let api = ScriptedGiftCodeApi::new().with_lookup(
            "404",
            LookupResult::Failure {
                msg: "role not exist.".into(),
            },
        );
        let (state, _) = state_with(api).await;

        let result = add_player(State(state.clone()), Json(AddPlayerRequest { fid: "404".into() })).await;

        assert!(matches!(result, Err(AppError::ExternalAPI(_))));
        assert!(state.notices.active().await.is_some());
    }
}
