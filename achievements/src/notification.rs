//! Notification records generated when achievements unlock.
//!
//! The engine only produces the records; storing and showing them is up to
//! the caller.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::Achievement;

#[cfg(feature = "typescript")]
use ts_rs::TS;

/// Kinds of notification the application knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationType {
    NewSubmission,
    ReportPublished,
    NewAssignment,
    NewFeedback,
    AchievementUnlocked,
    TeacherFeedback,
}

/// A message for one user's notification inbox.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,
    pub user_id: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub read: bool,
    #[serde(rename = "type")]
    pub notification_type: NotificationType,
    /// In-app route the notification opens
    #[serde(default)]
    pub link_to: Option<String>,
}

impl Notification {
    /// Build the unlock notice for one achievement.
    pub fn achievement_unlocked(
        user_id: impl Into<String>,
        achievement: &Achievement,
        profile_link: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: format!("notif-{}", achievement.id),
            user_id: user_id.into(),
            message: format!("Achievement Unlocked: {}!", achievement.name()),
            timestamp,
            read: false,
            notification_type: NotificationType::AchievementUnlocked,
            link_to: Some(profile_link.into()),
        }
    }
}

/// One notification per achievement, in the same order.
pub fn unlock_notifications(
    user_id: &str,
    unlocked: &[Achievement],
    profile_link: &str,
    timestamp: DateTime<Utc>,
) -> Vec<Notification> {
    unlocked
        .iter()
        .map(|achievement| {
            Notification::achievement_unlocked(user_id, achievement, profile_link, timestamp)
        })
        .collect()
}
