// Sled-backed key-value store; the default local persistence.
use sled::{Config, Db};
use std::path::Path;

use super::KeyValueStore;
use crate::error::{AppError, Result};

#[derive(Clone)]
pub struct SledStore {
    db: Db,
}

impl SledStore {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let db = Config::default().path(path).open()?;
        Ok(Self { db })
    }
}

#[async_trait::async_trait]
impl KeyValueStore for SledStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let Some(bytes) = self.db.get(key.as_bytes())? else {
            return Ok(None);
        };
        let text = String::from_utf8(bytes.to_vec())
            .map_err(|e| AppError::Internal(format!("value under '{}' is not utf-8: {}", key, e)))?;
        Ok(Some(text))
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.db.insert(key.as_bytes(), value.as_bytes())?;
        self.db.flush_async().await?;
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "sled"
    }
}
