use std::collections::HashSet;
use tokio::sync::{broadcast, RwLock};

use crate::{
    constants::{PLAYERS_KEY, ROSTER_EVENT_CAPACITY},
    db::{self, SharedStore},
    error::Result,
    models::{Player, RosterEvent},
};

/// Roster Store - ordered list of tracked players, written through to the
/// key-value store after every change.
pub struct RosterStore {
    players: RwLock<Vec<Player>>,
    store: SharedStore,
    events: broadcast::Sender<RosterEvent>,
}

impl RosterStore {
    /// Seed the roster from the `players` key. A missing key gives an empty roster;
    /// an unreadable one is an error so the saved list is never overwritten.
    pub async fn load(store: SharedStore) -> Result<Self> {
        let saved: Option<Vec<Player>> = db::get_json(store.as_ref(), PLAYERS_KEY).await?;
        let players = dedupe_by_fid(saved.unwrap_or_default());
        tracing::info!("Roster loaded with {} players", players.len());

        let (events, _) = broadcast::channel(ROSTER_EVENT_CAPACITY);
        Ok(Self {
            players: RwLock::new(players),
            store,
            events,
        })
    }

    pub fn subscribe(&self) -> broadcast::Receiver<RosterEvent> {
        self.events.subscribe()
    }

    pub async fn list(&self) -> Vec<Player> {
        self.players.read().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.players.read().await.len()
    }

    pub async fn get(&self, fid: &str) -> Option<Player> {
        self.players
            .read()
            .await
            .iter()
            .find(|p| p.fid == fid)
            .cloned()
    }

    pub async fn exists(&self, fid: &str) -> bool {
        self.players.read().await.iter().any(|p| p.fid == fid)
    }

    /// Append a player. Returns `false` (and changes nothing) when the fid is already tracked.
    pub async fn add(&self, player: Player) -> bool {
        let mut players = self.players.write().await;
        if players.iter().any(|p| p.fid == player.fid) {
            return false;
        }
        players.push(player.clone());
        self.persist(&players).await;
        self.publish(RosterEvent::Added { player });
        true
    }

    /// Replace the record with the same fid, keeping its position.
    pub async fn update(&self, player: Player) -> bool {
        let mut players = self.players.write().await;
        let Some(slot) = players.iter_mut().find(|p| p.fid == player.fid) else {
            tracing::debug!("Ignoring update for untracked player {}", player.fid);
            return false;
        };
        *slot = player.clone();
        self.persist(&players).await;
        self.publish(RosterEvent::Updated { player });
        true
    }

    pub async fn set_status(&self, fid: &str, status: &str) -> bool {
        match self.get(fid).await {
            Some(player) => self.update(player.with_status(status)).await,
            None => false,
        }
    }

    pub async fn remove(&self, fid: &str) -> bool {
        let mut players = self.players.write().await;
        let before = players.len();
        players.retain(|p| p.fid != fid);
        if players.len() == before {
            return false;
        }
        self.persist(&players).await;
        self.publish(RosterEvent::Removed {
            fid: fid.to_string(),
        });
        true
    }

    // Persistence is fire-and-forget: a failed write is logged and the
    // in-memory roster stays authoritative for this session.
    async fn persist(&self, players: &[Player]) {
        if let Err(err) = db::set_json(self.store.as_ref(), PLAYERS_KEY, players).await {
            tracing::warn!("Roster persist failed ({} players): {}", players.len(), err);
        }
    }

    fn publish(&self, event: RosterEvent) {
        // No subscribers is the normal case outside an open UI.
        let _ = self.events.send(event);
    }
}

fn dedupe_by_fid(players: Vec<Player>) -> Vec<Player> {
    let mut seen = HashSet::new();
    players
        .into_iter()
        .filter(|p| seen.insert(p.fid.clone()))
        .collect()
}
