// Key-value persistence for the roster and the grid snapshot.
pub mod memory;
pub mod redis_store;
pub mod sled_store;

use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;

use crate::{
    config::{Config, StoreBackend},
    error::Result,
};

pub use memory::MemoryStore;
pub use redis_store::RedisStore;
pub use sled_store::SledStore;

/// String values under string keys, the same shape as browser local storage.
#[async_trait::async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;

    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Short backend name for health output and logs.
    fn backend(&self) -> &'static str;
}

pub type SharedStore = Arc<dyn KeyValueStore>;

/// Open the backend selected by `STORE_BACKEND`.
pub async fn open_store(config: &Config) -> anyhow::Result<SharedStore> {
    let store: SharedStore = match config.store_backend {
        StoreBackend::Sled => Arc::new(SledStore::open(&config.store_path)?),
        StoreBackend::Redis => Arc::new(
            RedisStore::connect(&config.redis_url, &config.redis_key_prefix).await?,
        ),
        StoreBackend::Memory => Arc::new(MemoryStore::new()),
    };
    tracing::info!("Key-value store ready (backend={})", store.backend());
    Ok(store)
}

/// Read and deserialize a JSON value, `None` when the key was never written.
pub async fn get_json<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Result<Option<T>> {
    match store.get(key).await? {
        Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
        None => Ok(None),
    }
}

pub async fn set_json<T: Serialize + ?Sized>(store: &dyn KeyValueStore, key: &str, value: &T) -> Result<()> {
    let raw = serde_json::to_string(value)?;
    store.set(key, &raw).await
}
