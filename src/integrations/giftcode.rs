use reqwest::{header::CONTENT_TYPE, Client};
use serde_json::{json, Value};
use std::time::Duration;

use crate::{
    config::Config,
    constants::{GIFT_CODE_ENDPOINT, MISSING_PLAYER_DATA_MSG, PLAYER_ENDPOINT, UNKNOWN_PROVIDER_MSG},
    crypto::{signature::field_text, Fields, RequestSigner},
    error::{AppError, Result},
    models::PlayerProfile,
};

/// Outcome of a provider player lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum LookupResult {
    Success(PlayerProfile),
    Failure { msg: String },
    TransportError { reason: String },
}

/// Outcome of a provider gift code redemption.
#[derive(Debug, Clone, PartialEq)]
pub enum RedeemResult {
    Success,
    Failure { err_code: Option<i64>, msg: String },
    TransportError { reason: String },
}

/// The two provider operations the redemption workflow depends on.
///
/// Implementations never fail: transport problems are folded into the
/// `TransportError` variants so callers handle every outcome in one match.
#[async_trait::async_trait]
pub trait GiftCodeApi: Send + Sync {
    async fn lookup_player(&self, fid: &str, time: i64) -> LookupResult;

    async fn redeem_code(&self, cdk: &str, fid: &str, time: i64) -> RedeemResult;
}

#[derive(Clone, Debug)]
pub struct GiftCodeClient {
    base_url: String,
    signer: RequestSigner,
    client: Client,
}

impl GiftCodeClient {
    pub fn new(base_url: String, signer: RequestSigner, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(timeout.min(Duration::from_secs(4)))
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("Gift code HTTP client init failed: {}", e)))?;

        Ok(Self {
            base_url,
            signer,
            client,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            config.giftcode_api_url.clone(),
            RequestSigner::new(config.giftcode_salt.clone()),
            config.http_timeout(),
        )
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    /// Signs `fields`, posts them form-encoded and parses the JSON reply.
    /// Any transport problem comes back as `Err(reason)`.
    async fn post_signed(&self, path: &str, fields: &Fields) -> std::result::Result<Value, String> {
        let url = self.endpoint(path);
        let body = encode_form(&self.signer.sign(fields));

        let response = self
            .client
            .post(&url)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(body)
            .send()
            .await
            .map_err(|e| format!("request to {} failed: {}", url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(format!("{} returned HTTP {}", url, status));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| format!("{} returned an unreadable body: {}", url, e))
    }
}

#[async_trait::async_trait]
impl GiftCodeApi for GiftCodeClient {
    async fn lookup_player(&self, fid: &str, time: i64) -> LookupResult {
        let fields = to_fields(json!({ "fid": fid, "time": time }));

        match self.post_signed(PLAYER_ENDPOINT, &fields).await {
            Ok(body) => {
                let result = classify_lookup(&body, fid);
                if let LookupResult::Failure { msg } = &result {
                    tracing::debug!("Player lookup rejected fid={} msg={}", fid, msg);
                }
                result
            }
            Err(reason) => {
                tracing::warn!("Player lookup transport failure fid={} err={}", fid, reason);
                LookupResult::TransportError { reason }
            }
        }
    }

    async fn redeem_code(&self, cdk: &str, fid: &str, time: i64) -> RedeemResult {
        let fields = to_fields(json!({ "cdk": cdk, "fid": fid, "time": time }));

        match self.post_signed(GIFT_CODE_ENDPOINT, &fields).await {
            Ok(body) => classify_redeem(&body),
            Err(reason) => {
                tracing::warn!("Gift code transport failure fid={} err={}", fid, reason);
                RedeemResult::TransportError { reason }
            }
        }
    }
}

fn to_fields(value: Value) -> Fields {
    match value {
        Value::Object(map) => map,
        _ => Fields::new(),
    }
}

/// Flattens signed fields into an `application/x-www-form-urlencoded` body.
pub fn encode_form(fields: &Fields) -> String {
    let mut serializer = url::form_urlencoded::Serializer::new(String::new());
    for (key, value) in fields {
        serializer.append_pair(key, &field_text(value));
    }
    serializer.finish()
}

/// Maps a lookup reply: `code == 0` with a `data` object is a success.
/// A zero code without `data` fails with its own message rather than the provider's "success".
pub fn classify_lookup(body: &Value, requested_fid: &str) -> LookupResult {
    if response_code(body) != Some(0) {
        return LookupResult::Failure {
            msg: response_msg(body),
        };
    }

    let Some(data) = body.get("data").filter(|d| d.is_object()) else {
        return LookupResult::Failure {
            msg: MISSING_PLAYER_DATA_MSG.to_string(),
        };
    };

    match serde_json::from_value::<PlayerProfile>(data.clone()) {
        Ok(mut profile) => {
            if profile.fid.is_empty() {
                profile.fid = requested_fid.trim().to_string();
            }
            LookupResult::Success(profile)
        }
        Err(e) => LookupResult::Failure {
            msg: format!("unreadable player data: {}", e),
        },
    }
}

/// Maps a redemption reply: `code == 0` is a success, anything else carries `err_code`.
pub fn classify_redeem(body: &Value) -> RedeemResult {
    if response_code(body) == Some(0) {
        return RedeemResult::Success;
    }

    RedeemResult::Failure {
        err_code: body.get("err_code").and_then(value_to_i64),
        msg: response_msg(body),
    }
}

fn response_code(body: &Value) -> Option<i64> {
    body.get("code").and_then(value_to_i64)
}

fn response_msg(body: &Value) -> String {
    match body.get("msg") {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => UNKNOWN_PROVIDER_MSG.to_string(),
        Some(other) => other.to_string(),
    }
}

fn value_to_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
