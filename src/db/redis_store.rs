use redis::{aio::ConnectionManager, AsyncCommands};

use super::KeyValueStore;
use crate::error::Result;

/// Redis-backed store for running the service against a shared cache.
#[derive(Clone)]
pub struct RedisStore {
    conn: ConnectionManager,
    key_prefix: String,
}

impl RedisStore {
    pub async fn connect(redis_url: &str, key_prefix: &str) -> Result<Self> {
        let client = redis::Client::open(redis_url)?;
        let conn = ConnectionManager::new(client).await?;
        Ok(Self {
            conn,
            key_prefix: key_prefix.to_string(),
        })
    }

    fn full_key(&self, key: &str) -> String {
        prefixed_key(&self.key_prefix, key)
    }
}

fn prefixed_key(prefix: &str, key: &str) -> String {
    format!("{}{}", prefix, key)
}

#[async_trait::async_trait]
impl KeyValueStore for RedisStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut conn = self.conn.clone();
        let value: Option<String> = conn.get(self.full_key(key)).await?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut conn = self.conn.clone();
        let _: () = conn.set(self.full_key(key), value).await?;
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "redis"
    }
}
