use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::constants::STATUS_NOT_ATTEMPTED;

// ==================== PLAYER ====================
/// A tracked account in the roster. `fid` is the identity key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    #[serde(deserialize_with = "deserialize_identifier")]
    pub fid: String,
    #[serde(default, deserialize_with = "deserialize_identifier")]
    pub kid: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub avatar_image: String,
    #[serde(default)]
    pub redemption_status: String,
}

impl Player {
    pub fn with_status(&self, status: impl Into<String>) -> Self {
        Self {
            redemption_status: status.into(),
            ..self.clone()
        }
    }
}

impl From<PlayerProfile> for Player {
    fn from(profile: PlayerProfile) -> Self {
        Self {
            fid: profile.fid,
            kid: profile.kid,
            name: profile.nickname,
            avatar_image: profile.avatar_image,
            redemption_status: STATUS_NOT_ATTEMPTED.to_string(),
        }
    }
}

/// Player data returned by the provider lookup endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PlayerProfile {
    #[serde(deserialize_with = "deserialize_identifier")]
    pub fid: String,
    #[serde(default, deserialize_with = "deserialize_identifier")]
    pub kid: String,
    #[serde(default)]
    pub nickname: String,
    #[serde(default)]
    pub avatar_image: String,
}

/// Accepts identifiers the provider sends as either JSON numbers or strings.
fn deserialize_identifier<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s.trim().to_string()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Null => Ok(String::new()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number identifier, got {}",
            other
        ))),
    }
}

// ==================== VIEW SNAPSHOT ====================
/// Opaque grid configuration (columns, pagination, selection) owned by the UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ViewSnapshot(pub Value);

impl ViewSnapshot {
    pub fn empty() -> Self {
        Self(Value::Object(serde_json::Map::new()))
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        match &self.0 {
            Value::Object(map) => map.is_empty(),
            Value::Null => true,
            _ => false,
        }
    }
}

impl Default for ViewSnapshot {
    fn default() -> Self {
        Self::empty()
    }
}

// ==================== ROSTER EVENTS ====================
/// Change notifications pushed to websocket subscribers.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RosterEvent {
    Added { player: Player },
    Updated { player: Player },
    Removed { fid: String },
}

// ==================== REDEMPTION ====================
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RedemptionOutcome {
    pub fid: String,
    pub status: String,
    pub succeeded: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct RedemptionReport {
    pub cdk: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub succeeded: usize,
    pub failed: usize,
    pub outcomes: Vec<RedemptionOutcome>,
}

// ==================== API RESPONSE ====================
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn api_response_success_sets_flag() {
        let response = ApiResponse::success("ok");
        assert!(response.success);
        assert_eq!(response.data, "ok");
    }

    #[test]
    fn profile_accepts_numeric_identifiers() {
        let profile: PlayerProfile = serde_json::from_value(json!({
            "fid": 123456789,
            "kid": 245,
            "nickname": "Frosty",
            "avatar_image": "https://example.com/a.png",
            "stove_lv": 30
        }))
        .expect("profile should parse");

        assert_eq!(profile.fid, "123456789");
        assert_eq!(profile.kid, "245");

        let player = Player::from(profile);
        assert_eq!(player.name, "Frosty");
        assert_eq!(player.redemption_status, "");
    }

    #[test]
    fn player_record_uses_storage_field_names() {
        let player = Player {
            fid: "1".into(),
            kid: "2".into(),
            name: "n".into(),
            avatar_image: "a".into(),
            redemption_status: "".into(),
        };
        let value = serde_json::to_value(&player).expect("serialize");
        assert_eq!(
            value,
            json!({"fid": "1", "kid": "2", "name": "n", "avatar_image": "a", "redemption_status": ""})
        );
    }

    #[test]
    fn player_missing_optional_fields_defaults_to_empty() {
        let player: Player = serde_json::from_value(json!({"fid": 7})).expect("parse");
        assert_eq!(player.fid, "7");
        assert_eq!(player.kid, "");
        assert_eq!(player.redemption_status, "");
    }

    #[test]
    fn roster_event_is_tagged() {
        let event = RosterEvent::Removed { fid: "9".into() };
        let value = serde_json::to_value(&event).expect("serialize");
        assert_eq!(value, json!({"type": "removed", "fid": "9"}));
    }

    #[test]
    fn empty_view_snapshot_is_empty_object() {
        let snapshot = ViewSnapshot::default();
        assert!(snapshot.is_empty());
        assert_eq!(serde_json::to_string(&snapshot).unwrap(), "{}");
        assert!(!ViewSnapshot(json!({"pagination": {"pageSize": 10}})).is_empty());
    }
}
