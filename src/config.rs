use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::constants::{
    DEFAULT_ERROR_NOTICE_TTL_MS, DEFAULT_GIFTCODE_API_URL, DEFAULT_HTTP_TIMEOUT_SECS,
    DEFAULT_REDEEM_PACING_MS, DEFAULT_REDIS_KEY_PREFIX, DEFAULT_SIGN_SALT, DEFAULT_STORE_PATH,
};

/// Where the roster and view snapshot are persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Sled,
    Redis,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = anyhow::Error;

    fn from_str(raw: &str) -> anyhow::Result<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "sled" | "" => Ok(StoreBackend::Sled),
            "redis" => Ok(StoreBackend::Redis),
            "memory" => Ok(StoreBackend::Memory),
            other => anyhow::bail!("Unknown STORE_BACKEND '{}'", other),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    // Server
    pub host: String,
    pub port: u16,
    pub environment: String,

    // Provider API
    pub giftcode_api_url: String,
    pub giftcode_salt: String,
    pub http_timeout_secs: u64,

    // Workflow
    pub redeem_pacing_ms: u64,
    pub error_notice_ttl_ms: u64,

    // Storage
    pub store_backend: StoreBackend,
    pub store_path: String,
    pub redis_url: String,
    pub redis_key_prefix: String,

    // CORS
    pub cors_allowed_origins: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Config {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()?,
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),

            giftcode_api_url: env::var("GIFTCODE_API_URL")
                .unwrap_or_else(|_| DEFAULT_GIFTCODE_API_URL.to_string()),
            giftcode_salt: env::var("GIFTCODE_SALT")
                .unwrap_or_else(|_| DEFAULT_SIGN_SALT.to_string()),
            http_timeout_secs: env::var("HTTP_TIMEOUT_SECS")
                .unwrap_or_else(|_| DEFAULT_HTTP_TIMEOUT_SECS.to_string())
                .parse()?,

            redeem_pacing_ms: env::var("REDEEM_PACING_MS")
                .unwrap_or_else(|_| DEFAULT_REDEEM_PACING_MS.to_string())
                .parse()?,
            error_notice_ttl_ms: env::var("ERROR_NOTICE_TTL_MS")
                .unwrap_or_else(|_| DEFAULT_ERROR_NOTICE_TTL_MS.to_string())
                .parse()?,

            store_backend: env::var("STORE_BACKEND")
                .unwrap_or_else(|_| "sled".to_string())
                .parse()?,
            store_path: env::var("STORE_PATH").unwrap_or_else(|_| DEFAULT_STORE_PATH.to_string()),
            redis_url: env::var("REDIS_URL")
                .unwrap_or_else(|_| "redis://localhost:6379".to_string()),
            redis_key_prefix: env::var("REDIS_KEY_PREFIX")
                .unwrap_or_else(|_| DEFAULT_REDIS_KEY_PREFIX.to_string()),

            cors_allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                .unwrap_or_else(|_| "*".to_string()),
        })
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.giftcode_api_url.trim().is_empty() {
            anyhow::bail!("GIFTCODE_API_URL is empty");
        }
        url::Url::parse(self.giftcode_api_url.trim())
            .map_err(|e| anyhow::anyhow!("GIFTCODE_API_URL is invalid: {}", e))?;
        if self.giftcode_salt.is_empty() {
            anyhow::bail!("GIFTCODE_SALT is empty");
        }
        if self.http_timeout_secs == 0 {
            anyhow::bail!("HTTP_TIMEOUT_SECS must be > 0");
        }
        if self.store_backend == StoreBackend::Sled && self.store_path.trim().is_empty() {
            anyhow::bail!("STORE_PATH is empty");
        }
        if self.store_backend == StoreBackend::Redis && self.redis_url.trim().is_empty() {
            anyhow::bail!("REDIS_URL is empty");
        }

        if self.giftcode_salt != DEFAULT_SIGN_SALT {
            tracing::warn!("Using a non-default request signing salt; the provider may reject requests");
        }
        if self.redeem_pacing_ms == 0 {
            tracing::warn!("REDEEM_PACING_MS is 0; batches will hit the provider back to back");
        }
        if self.store_backend == StoreBackend::Memory {
            tracing::warn!("STORE_BACKEND=memory; the roster will not survive a restart");
        }
        if self.cors_allowed_origins.trim().is_empty() {
            tracing::warn!("CORS_ALLOWED_ORIGINS is empty; requests may be blocked");
        }

        Ok(())
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    pub fn redeem_pacing(&self) -> Duration {
        Duration::from_millis(self.redeem_pacing_ms)
    }

    pub fn error_notice_ttl(&self) -> Duration {
        Duration::from_millis(self.error_notice_ttl_ms)
    }
}

#[cfg(test)]
pub(crate) fn test_config() -> Config {
    Config {
        host: "127.0.0.1".to_string(),
        port: 3000,
        environment: "development".to_string(),
        giftcode_api_url: "http://127.0.0.1:9".to_string(),
        giftcode_salt: DEFAULT_SIGN_SALT.to_string(),
        http_timeout_secs: 2,
        redeem_pacing_ms: 0,
        error_notice_ttl_ms: DEFAULT_ERROR_NOTICE_TTL_MS,
        store_backend: StoreBackend::Memory,
        store_path: String::new(),
        redis_url: "redis://localhost:6379".to_string(),
        redis_key_prefix: DEFAULT_REDIS_KEY_PREFIX.to_string(),
        cors_allowed_origins: "*".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_backend_parses_known_values() {
        assert_eq!("sled".parse::<StoreBackend>().unwrap(), StoreBackend::Sled);
        assert_eq!(" Redis ".parse::<StoreBackend>().unwrap(), StoreBackend::Redis);
        assert_eq!("memory".parse::<StoreBackend>().unwrap(), StoreBackend::Memory);
        assert_eq!("".parse::<StoreBackend>().unwrap(), StoreBackend::Sled);
        assert!("postgres".parse::<StoreBackend>().is_err());
    }

    #[test]
    fn validate_accepts_test_config() {
        assert!(test_config().validate().is_ok());
    }

    #[test]
    fn validate_rejects_empty_salt_and_bad_url() {
        let mut config = test_config();
        config.giftcode_salt = String::new();
        assert!(config.validate().is_err());

        let mut config = test_config();
        config.giftcode_api_url = "not a url".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn durations_follow_configured_millis() {
        let mut config = test_config();
        config.redeem_pacing_ms = 1500;
        assert_eq!(config.redeem_pacing(), Duration::from_millis(1500));
        assert_eq!(config.error_notice_ttl(), Duration::from_millis(6000));
    }
}
