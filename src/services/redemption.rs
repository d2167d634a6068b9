use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

use crate::{
    constants::{
        ERR_ALREADY_REDEEMED, ERR_EXPIRED_GIFT_CODE, ERR_INVALID_GIFT_CODE,
        ERR_TOO_MANY_REDEMPTIONS, LOGIN_FAILED_PREFIX, PROVIDER_UNREACHABLE_MSG,
        REDEMPTION_FAILED_PREFIX, STATUS_NOT_ATTEMPTED, STATUS_REDEEMED,
    },
    error::{AppError, Result},
    integrations::{GiftCodeApi, LookupResult, RedeemResult},
    models::{Player, RedemptionOutcome, RedemptionReport},
    utils::{normalize_fids, now_millis},
};

use super::{NotificationService, RosterStore};

/// Result of an add-player request that reached the provider successfully.
#[derive(Debug, Clone, PartialEq)]
pub enum AddPlayerOutcome {
    Added(Player),
    AlreadyTracked(Player),
}

/// Redemption Workflow - drives lookup then redeem for a selection of roster
/// entries, one provider request at a time.
pub struct RedemptionWorkflow {
    api: Arc<dyn GiftCodeApi>,
    roster: Arc<RosterStore>,
    notices: Arc<NotificationService>,
    pacing: Duration,
    batch_guard: Mutex<()>,
}

impl RedemptionWorkflow {
    pub fn new(
        api: Arc<dyn GiftCodeApi>,
        roster: Arc<RosterStore>,
        notices: Arc<NotificationService>,
        pacing: Duration,
    ) -> Self {
        Self {
            api,
            roster,
            notices,
            pacing,
            batch_guard: Mutex::new(()),
        }
    }

    /// Look up `candidate` and track it. Provider rejections raise an error notice
    /// and come back as `AppError::ExternalAPI`.
    pub async fn add_player(&self, candidate: &str) -> Result<AddPlayerOutcome> {
        let candidate = candidate.trim();
        if candidate.is_empty() {
            return Err(AppError::BadRequest("Player ID is empty".to_string()));
        }

        let msg = match self.api.lookup_player(candidate, now_millis()).await {
            LookupResult::Success(profile) => {
                if let Some(existing) = self.roster.get(&profile.fid).await {
                    return Ok(AddPlayerOutcome::AlreadyTracked(existing));
                }
                let player = Player::from(profile);
                self.roster.add(player.clone()).await;
                tracing::info!("Player added fid={} name={}", player.fid, player.name);
                return Ok(AddPlayerOutcome::Added(player));
            }
            LookupResult::Failure { msg } => msg,
            LookupResult::TransportError { .. } => PROVIDER_UNREACHABLE_MSG.to_string(),
        };

        self.notices.raise(msg.clone()).await;
        Err(AppError::ExternalAPI(msg))
    }

    /// Drop every selected fid from the roster. Returns how many were present.
    pub async fn remove_selected(&self, selected: Vec<String>) -> usize {
        let mut removed = 0;
        for fid in normalize_fids(selected) {
            if self.roster.remove(&fid).await {
                removed += 1;
            }
        }
        tracing::info!("Removed {} players", removed);
        removed
    }

    /// Run [`Self::redeem_selected`] on its own task and wait for the report.
    ///
    /// Dropping the returned future (the HTTP caller went away) leaves the
    /// batch running until every selected player has a final status.
    pub async fn redeem_detached(
        self: Arc<Self>,
        cdk: String,
        selected: Vec<String>,
    ) -> Result<RedemptionReport> {
        let batch = tokio::spawn(async move { self.redeem_selected(&cdk, selected).await });
        batch
            .await
            .map_err(|e| AppError::Internal(format!("Redemption batch task failed: {}", e)))?
    }

    /// Redeem `cdk` for each selected fid in order.
    ///
    /// The selection is fixed when the batch starts and only keeps fids the
    /// roster tracks at that moment. Every selected status is reset to empty
    /// before the first provider request, and a failure for one player never
    /// stops the rest of the batch.
    pub async fn redeem_selected(&self, cdk: &str, selected: Vec<String>) -> Result<RedemptionReport> {
        let cdk = cdk.trim().to_string();
        if cdk.is_empty() {
            return Err(AppError::BadRequest("Gift code is empty".to_string()));
        }
        let requested = normalize_fids(selected);
        if requested.is_empty() {
            return Err(AppError::BadRequest("No players selected".to_string()));
        }

        let _batch = self.batch_guard.lock().await;

        let mut selection = Vec::with_capacity(requested.len());
        for fid in requested {
            if self.roster.exists(&fid).await {
                selection.push(fid);
            } else {
                tracing::warn!("Skipping untracked fid={}", fid);
            }
        }
        if selection.is_empty() {
            return Err(AppError::BadRequest("No tracked players selected".to_string()));
        }

        let started_at = Utc::now();
        tracing::info!("Redeeming {} for {} players", cdk, selection.len());

        for fid in &selection {
            self.roster.set_status(fid, STATUS_NOT_ATTEMPTED).await;
        }

        let mut outcomes = Vec::with_capacity(selection.len());
        for (index, fid) in selection.iter().enumerate() {
            if index > 0 && !self.pacing.is_zero() {
                tokio::time::sleep(self.pacing).await;
            }

            let outcome = self.redeem_one(&cdk, fid).await;
            self.roster.set_status(fid, &outcome.status).await;
            tracing::info!("fid={} status={}", fid, outcome.status);
            outcomes.push(outcome);
        }

        let succeeded = outcomes.iter().filter(|o| o.succeeded).count();
        Ok(RedemptionReport {
            cdk,
            started_at,
            finished_at: Utc::now(),
            succeeded,
            failed: outcomes.len() - succeeded,
            outcomes,
        })
    }

    async fn redeem_one(&self, cdk: &str, fid: &str) -> RedemptionOutcome {
        let login = self.api.lookup_player(fid, now_millis()).await;
        if let Some(status) = login_failure_status(&login) {
            return RedemptionOutcome {
                fid: fid.to_string(),
                status,
                succeeded: false,
            };
        }

        let result = self.api.redeem_code(cdk, fid, now_millis()).await;
        RedemptionOutcome {
            fid: fid.to_string(),
            succeeded: result == RedeemResult::Success,
            status: redemption_status(&result),
        }
    }
}

/// `Some(status)` when the lookup step failed and redemption must be skipped.
pub fn login_failure_status(result: &LookupResult) -> Option<String> {
    match result {
        LookupResult::Success(_) => None,
        LookupResult::Failure { msg } => Some(format!("{}{}", LOGIN_FAILED_PREFIX, msg)),
        LookupResult::TransportError { .. } => {
            Some(format!("{}{}", LOGIN_FAILED_PREFIX, PROVIDER_UNREACHABLE_MSG))
        }
    }
}

pub fn redemption_status(result: &RedeemResult) -> String {
    match result {
        RedeemResult::Success => STATUS_REDEEMED.to_string(),
        RedeemResult::Failure { err_code, msg } => {
            let reason = match *err_code {
                Some(ERR_TOO_MANY_REDEMPTIONS) => "TOO MANY REDEMPTIONS",
                Some(ERR_EXPIRED_GIFT_CODE) => "EXPIRED GIFT CODE",
                Some(ERR_ALREADY_REDEEMED) => "PLAYER HAS ALREADY REDEEMED GIFT CODE",
                Some(ERR_INVALID_GIFT_CODE) => "INVALID GIFT CODE",
                _ => msg.as_str(),
            };
            format!("{}{}", REDEMPTION_FAILED_PREFIX, reason)
        }
        RedeemResult::TransportError { .. } => {
            format!("{}{}", REDEMPTION_FAILED_PREFIX, PROVIDER_UNREACHABLE_MSG)
        }
    }
}
