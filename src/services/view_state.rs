use tokio::sync::RwLock;

use crate::{
    constants::VIEW_STATE_KEY,
    db::{self, SharedStore},
    error::Result,
    models::ViewSnapshot,
};

/// View State Store - the grid configuration handed from one session to the next.
///
/// The UI pushes its configuration with [`ViewStateStore::replace`] while it runs;
/// only [`ViewStateStore::persist_current`] (page unload, shutdown) writes it out.
pub struct ViewStateStore {
    current: RwLock<ViewSnapshot>,
    store: SharedStore,
}

impl ViewStateStore {
    /// Startup hand-off: load the saved snapshot, falling back to `{}`.
    pub async fn restore(store: SharedStore) -> Self {
        let this = Self {
            current: RwLock::new(ViewSnapshot::empty()),
            store,
        };

        match this.load().await {
            Ok(Some(snapshot)) => {
                tracing::info!("Restored saved grid state");
                *this.current.write().await = snapshot;
            }
            Ok(None) => tracing::debug!("No saved grid state; starting with defaults"),
            Err(err) => tracing::warn!("Ignoring unreadable grid state: {}", err),
        }

        this
    }

    /// Read the persisted snapshot, `None` when nothing was ever saved.
    pub async fn load(&self) -> Result<Option<ViewSnapshot>> {
        db::get_json(self.store.as_ref(), VIEW_STATE_KEY).await
    }

    pub async fn save(&self, snapshot: &ViewSnapshot) -> Result<()> {
        db::set_json(self.store.as_ref(), VIEW_STATE_KEY, snapshot).await
    }

    /// The configuration currently held for this session.
    pub async fn capture(&self) -> ViewSnapshot {
        self.current.read().await.clone()
    }

    pub async fn replace(&self, snapshot: ViewSnapshot) {
        *self.current.write().await = snapshot;
    }

    /// Capture then save; called on page unload and on shutdown.
    pub async fn persist_current(&self) -> Result<ViewSnapshot> {
        let snapshot = self.capture().await;
        self.save(&snapshot).await?;
        tracing::info!("Grid state saved");
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{KeyValueStore, MemoryStore};
    use serde_json::json;
    use std::sync::Arc;

    fn memory() -> SharedStore {
        Arc::new(MemoryStore::new())
    }

    #[tokio::test]
    async fn restore_without_saved_state_is_empty_object() {
        let views = ViewStateStore::restore(memory()).await;
        assert!(views.capture().await.is_empty());
        assert!(views.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn replace_is_not_persisted_until_unload() {
        let store = memory();
        let views = ViewStateStore::restore(store.clone()).await;
        let snapshot = ViewSnapshot(json!({"pagination": {"paginationModel": {"pageSize": 20}}}));

        views.replace(snapshot.clone()).await;
        assert!(store.get(VIEW_STATE_KEY).await.unwrap().is_none());

        views.persist_current().await.expect("save");
        let next_session = ViewStateStore::restore(store).await;
        assert_eq!(next_session.capture().await, snapshot);
    }

    #[tokio::test]
    async fn corrupt_saved_state_falls_back_to_empty() {
        let store = memory();
        store.set(VIEW_STATE_KEY, "{broken").await.unwrap();

        let views = ViewStateStore::restore(store).await;
        assert!(views.capture().await.is_empty());
    }
}
