// Scripted provider used by workflow and API tests.
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use super::giftcode::{GiftCodeApi, LookupResult, RedeemResult};
use crate::{models::PlayerProfile, services::RosterStore};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiCall {
    Lookup { fid: String },
    Redeem { cdk: String, fid: String },
}

/// Answers lookups and redemptions from per-fid scripts (success by default)
/// and records every call in order.
#[derive(Default)]
pub struct ScriptedGiftCodeApi {
    lookups: Mutex<HashMap<String, LookupResult>>,
    redeems: Mutex<HashMap<String, RedeemResult>>,
    calls: Mutex<Vec<ApiCall>>,
    roster_probe: Mutex<Option<Arc<RosterStore>>>,
    seen_statuses: Mutex<Vec<Vec<(String, String)>>>,
    removals: Mutex<Vec<(String, String)>>,
}

impl ScriptedGiftCodeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn profile(fid: &str) -> PlayerProfile {
        PlayerProfile {
            fid: fid.to_string(),
            kid: "245".to_string(),
            nickname: format!("player-{}", fid),
            avatar_image: format!("https://example.com/{}.png", fid),
        }
    }

    pub fn with_lookup(self, fid: &str, result: LookupResult) -> Self {
        self.lookups.lock().unwrap().insert(fid.to_string(), result);
        self
    }

    pub fn with_redeem(self, fid: &str, result: RedeemResult) -> Self {
        self.redeems.lock().unwrap().insert(fid.to_string(), result);
        self
    }

    /// Record the roster's `(fid, status)` pairs at every provider call.
    pub fn probe_roster(&self, roster: Arc<RosterStore>) {
        *self.roster_probe.lock().unwrap() = Some(roster);
    }

    /// Remove `target` from the probed roster when `trigger` is looked up,
    /// i.e. while a batch is running.
    pub fn remove_on_lookup(&self, trigger: &str, target: &str) {
        self.removals
            .lock()
            .unwrap()
            .push((trigger.to_string(), target.to_string()));
    }

    pub fn calls(&self) -> Vec<ApiCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn redeem_calls_for(&self, fid: &str) -> usize {
        self.calls()
            .iter()
            .filter(|call| matches!(call, ApiCall::Redeem { fid: f, .. } if f == fid))
            .count()
    }

    pub fn seen_statuses(&self) -> Vec<Vec<(String, String)>> {
        self.seen_statuses.lock().unwrap().clone()
    }

    async fn record(&self, call: ApiCall) {
        let removal = match &call {
            ApiCall::Lookup { fid } => self
                .removals
                .lock()
                .unwrap()
                .iter()
                .find(|(trigger, _)| trigger == fid)
                .map(|(_, target)| target.clone()),
            ApiCall::Redeem { .. } => None,
        };
        self.calls.lock().unwrap().push(call);
        let probe = self.roster_probe.lock().unwrap().clone();
        if let Some(roster) = probe {
            let statuses = roster
                .list()
                .await
                .into_iter()
                .map(|p| (p.fid, p.redemption_status))
                .collect();
            self.seen_statuses.lock().unwrap().push(statuses);
            if let Some(target) = removal {
                roster.remove(&target).await;
            }
        }
    }
}

#[async_trait::async_trait]
impl GiftCodeApi for ScriptedGiftCodeApi {
    async fn lookup_player(&self, fid: &str, _time: i64) -> LookupResult {
        self.record(ApiCall::Lookup { fid: fid.to_string() }).await;
        self.lookups
            .lock()
            .unwrap()
            .get(fid)
            .cloned()
            .unwrap_or_else(|| LookupResult::Success(Self::profile(fid)))
    }

    async fn redeem_code(&self, cdk: &str, fid: &str, _time: i64) -> RedeemResult {
        self.record(ApiCall::Redeem {
            cdk: cdk.to_string(),
            fid: fid.to_string(),
        })
        .await;
        self.redeems
            .lock()
            .unwrap()
            .get(fid)
            .cloned()
            .unwrap_or(RedeemResult::Success)
    }
}
