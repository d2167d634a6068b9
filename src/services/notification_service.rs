use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Duration;
use tokio::sync::RwLock;

/// A user-facing error banner that dismisses itself after a fixed time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorNotice {
    pub message: String,
    pub raised_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// Notification Service - holds the single active error notice.
pub struct NotificationService {
    current: RwLock<Option<ErrorNotice>>,
    ttl: Duration,
}

impl NotificationService {
    pub fn new(ttl: Duration) -> Self {
        Self {
            current: RwLock::new(None),
            ttl,
        }
    }

    /// Replace any active notice with `message`.
    pub async fn raise(&self, message: impl Into<String>) -> ErrorNotice {
        let raised_at = Utc::now();
        let ttl = chrono::Duration::from_std(self.ttl).unwrap_or_else(|_| chrono::Duration::zero());
        let notice = ErrorNotice {
            message: message.into(),
            raised_at,
            expires_at: raised_at + ttl,
        };
        tracing::info!("Error notice: {}", notice.message);
        *self.current.write().await = Some(notice.clone());
        notice
    }

    /// The active notice, if it has not expired yet.
    pub async fn active(&self) -> Option<ErrorNotice> {
        self.active_at(Utc::now()).await
    }

    async fn active_at(&self, now: DateTime<Utc>) -> Option<ErrorNotice> {
        let mut current = self.current.write().await;
        if current.as_ref().is_some_and(|n| n.expires_at <= now) {
            *current = None;
        }
        current.clone()
    }

    pub async fn dismiss(&self) {
        *self.current.write().await = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn raised_notice_is_active_until_expiry() {
        let notices = NotificationService::new(Duration::from_millis(6000));
        let notice = notices.raise("role not exist.").await;

        assert_eq!(notices.active().await, Some(notice.clone()));
        assert_eq!((notice.expires_at - notice.raised_at).num_milliseconds(), 6000);

        let later = notice.expires_at + chrono::Duration::milliseconds(1);
        assert!(notices.active_at(later).await.is_none());
        assert!(notices.active().await.is_none());
    }

    #[tokio::test]
    async fn newer_notice_replaces_older() {
        let notices = NotificationService::new(Duration::from_secs(60));
        notices.raise("first").await;
        notices.raise("second").await;
        assert_eq!(notices.active().await.map(|n| n.message), Some("second".to_string()));
    }

    #[tokio::test]
    async fn dismiss_clears_notice() {
        let notices = NotificationService::new(Duration::from_secs(60));
        notices.raise("x").await;
        notices.dismiss().await;
        assert!(notices.active().await.is_none());
    }
}
