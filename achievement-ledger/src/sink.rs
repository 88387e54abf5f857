//! Delivery of unlock notifications.
//!
//! The ledger hands every batch of notifications to a [`NotificationSink`].
//! Showing them to users is outside this crate.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use achievements::Notification;

use crate::error::{LedgerError, Result};

/// Destination for notifications produced by achievement unlocks.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// Append a batch of notifications, keeping their order.
    async fn deliver(&self, notifications: &[Notification]) -> Result<()>;
}

/// Notification inbox kept in memory.
pub struct InMemoryNotificationSink {
    notifications: Arc<RwLock<Vec<Notification>>>,
}

impl InMemoryNotificationSink {
    /// Create an empty inbox.
    pub fn new() -> Self {
        Self {
            notifications: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// All notifications for a user, oldest first.
    pub async fn for_user(&self, user_id: &str) -> Vec<Notification> {
        let notifications = self.notifications.read().await;
        notifications
            .iter()
            .filter(|n| n.user_id == user_id)
            .cloned()
            .collect()
    }

    pub async fn unread_count(&self, user_id: &str) -> usize {
        let notifications = self.notifications.read().await;
        notifications
            .iter()
            .filter(|n| n.user_id == user_id && !n.read)
            .count()
    }

    /// Mark a notification as read.
    pub async fn mark_read(&self, notification_id: &str) -> Result<()> {
        let mut notifications = self.notifications.write().await;

        match notifications.iter_mut().find(|n| n.id == notification_id) {
            Some(notification) => {
                notification.read = true;
                Ok(())
            }
            None => Err(LedgerError::NotificationNotFound(
                notification_id.to_string(),
            )),
        }
    }

    pub async fn len(&self) -> usize {
        self.notifications.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.notifications.read().await.is_empty()
    }
}

impl Default for InMemoryNotificationSink {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NotificationSink for InMemoryNotificationSink {
    async fn deliver(&self, notifications: &[Notification]) -> Result<()> {
        let mut inbox = self.notifications.write().await;
        inbox.extend_from_slice(notifications);
        tracing::debug!(count = notifications.len(), "Delivered notifications");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use achievements::{Achievement, AchievementType};
    use chrono::Utc;

    fn unlock_notice(user_id: &str, achievement_type: AchievementType) -> Notification {
        let now = Utc::now();
        let achievement = Achievement::unlock(achievement_type, now);
        Notification::achievement_unlocked(user_id, &achievement, "/dashboard/profile", now)
    }

    #[tokio::test]
    async fn test_deliver_and_read() {
        let sink = InMemoryNotificationSink::new();
        let first = unlock_notice("student1", AchievementType::FirstSubmission);
        let other = unlock_notice("student2", AchievementType::FirstSubmission);

        sink.deliver(&[first.clone(), other]).await.unwrap();

        assert_eq!(sink.len().await, 2);
        assert_eq!(sink.for_user("student1").await.len(), 1);
        assert_eq!(sink.unread_count("student1").await, 1);

        sink.mark_read(&first.id).await.unwrap();
        assert_eq!(sink.unread_count("student1").await, 0);
        assert_eq!(sink.unread_count("student2").await, 1);
    }

    #[tokio::test]
    async fn test_mark_read_unknown() {
        let sink = InMemoryNotificationSink::new();
        let result = sink.mark_read("notif-missing").await;
        assert!(matches!(result, Err(LedgerError::NotificationNotFound(_))));
    }
}
