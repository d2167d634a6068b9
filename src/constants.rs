/// Application constants

// API version
pub const API_VERSION: &str = "v1";

// Provider (Whiteout Survival gift code API)
pub const DEFAULT_GIFTCODE_API_URL: &str = "https://wos-giftcode-api.centurygame.com";
pub const PLAYER_ENDPOINT: &str = "/api/player";
pub const GIFT_CODE_ENDPOINT: &str = "/api/gift_code";
pub const DEFAULT_SIGN_SALT: &str = "tB87#kPtkxqOS2";
pub const SIGN_FIELD: &str = "sign";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;

// Provider redemption error codes
pub const ERR_TOO_MANY_REDEMPTIONS: i64 = 40005;
pub const ERR_EXPIRED_GIFT_CODE: i64 = 40007;
pub const ERR_ALREADY_REDEEMED: i64 = 40008;
pub const ERR_INVALID_GIFT_CODE: i64 = 40014;

// Redemption status strings shown in the roster grid
pub const STATUS_NOT_ATTEMPTED: &str = "";
pub const STATUS_REDEEMED: &str = "Succesfully redemeed";
pub const LOGIN_FAILED_PREFIX: &str = "Login Failed: ";
pub const REDEMPTION_FAILED_PREFIX: &str = "Redemption Failed: ";
pub const PROVIDER_UNREACHABLE_MSG: &str = "provider unreachable";
pub const UNKNOWN_PROVIDER_MSG: &str = "unknown error";
pub const MISSING_PLAYER_DATA_MSG: &str = "missing player data";

// Persistent key-value store keys
pub const PLAYERS_KEY: &str = "players";
pub const VIEW_STATE_KEY: &str = "dataGridState";
pub const DEFAULT_STORE_PATH: &str = "./data/giftcode.sled";
pub const DEFAULT_REDIS_KEY_PREFIX: &str = "wos:";

// Workflow pacing and notices
pub const DEFAULT_REDEEM_PACING_MS: u64 = 1000;
pub const DEFAULT_ERROR_NOTICE_TTL_MS: u64 = 6000;

// WebSocket configuration
pub const WS_HEARTBEAT_INTERVAL_SECS: u64 = 30;
pub const WS_CLIENT_TIMEOUT_SECS: u64 = 60;
pub const ROSTER_EVENT_CAPACITY: usize = 100;
