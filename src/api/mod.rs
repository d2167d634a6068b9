// src/api/mod.rs

pub mod health;
pub mod notice;
pub mod players;
pub mod redeem;
pub mod view_state;

use std::sync::Arc;

use crate::config::Config;
use crate::services::{NotificationService, RedemptionWorkflow, RosterStore, ViewStateStore};

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub roster: Arc<RosterStore>,
    pub view_state: Arc<ViewStateStore>,
    pub notices: Arc<NotificationService>,
    pub workflow: Arc<RedemptionWorkflow>,
    pub store_backend: &'static str,
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::db::{MemoryStore, SharedStore};
    use crate::integrations::testing::ScriptedGiftCodeApi;

    pub async fn state_with(api: ScriptedGiftCodeApi) -> (AppState, Arc<ScriptedGiftCodeApi>) {
        state_with_config(api, crate::config::test_config()).await
    }

    pub async fn state_with_config(
        api: ScriptedGiftCodeApi,
        config: Config,
    ) -> (AppState, Arc<ScriptedGiftCodeApi>) {
        let store: SharedStore = Arc::new(MemoryStore::new());
        let roster = Arc::new(RosterStore::load(store.clone()).await.expect("roster"));
        let view_state = Arc::new(ViewStateStore::restore(store).await);
        let notices = Arc::new(NotificationService::new(config.error_notice_ttl()));
        let api = Arc::new(api);
        let workflow = Arc::new(RedemptionWorkflow::new(
            api.clone(),
            roster.clone(),
            notices.clone(),
            config.redeem_pacing(),
        ));

        let state = AppState {
            config,
            roster,
            view_state,
            notices,
            workflow,
            store_backend: "memory",
        };
        (state, api)
    }
}
