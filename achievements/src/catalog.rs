//! The fixed registry of achievements a student can earn.
//!
//! Every badge is identified by its [`AchievementType`]; name, description
//! and icon are looked up from the catalog so that stored achievements only
//! need to carry the type and the unlock time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[cfg(feature = "typescript")]
use ts_rs::TS;

/// Kinds of achievement, in catalog order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AchievementType {
    FirstSubmission,
    OnTimeSubmission,
    IntegrityAce,
    #[serde(rename = "STREAK_3")]
    Streak3,
    #[serde(rename = "STREAK_5")]
    Streak5,
    MostImproved,
    ProactivePlanner,
    PerfectScore,
    FeedbackProvider,
}

impl AchievementType {
    /// Stored tag for this type.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FirstSubmission => "FIRST_SUBMISSION",
            Self::OnTimeSubmission => "ON_TIME_SUBMISSION",
            Self::IntegrityAce => "INTEGRITY_ACE",
            Self::Streak3 => "STREAK_3",
            Self::Streak5 => "STREAK_5",
            Self::MostImproved => "MOST_IMPROVED",
            Self::ProactivePlanner => "PROACTIVE_PLANNER",
            Self::PerfectScore => "PERFECT_SCORE",
            Self::FeedbackProvider => "FEEDBACK_PROVIDER",
        }
    }

    /// Catalog entry for this type.
    pub fn definition(&self) -> &'static AchievementDefinition {
        definition(*self)
    }

    /// All types in catalog order.
    pub fn all() -> impl Iterator<Item = AchievementType> {
        CATALOG.iter().map(|d| d.achievement_type)
    }
}

impl std::fmt::Display for AchievementType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Icon shown on a badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub enum IconKey {
    RocketLaunch,
    Clock,
    ShieldCheck,
    Fire,
    ArrowTrendingUp,
    CalendarDays,
    CheckBadge,
    ChatBubbleLeftRight,
    /// Fallback for badges without a dedicated icon
    Trophy,
}

impl IconKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RocketLaunch => "RocketLaunch",
            Self::Clock => "Clock",
            Self::ShieldCheck => "ShieldCheck",
            Self::Fire => "Fire",
            Self::ArrowTrendingUp => "ArrowTrendingUp",
            Self::CalendarDays => "CalendarDays",
            Self::CheckBadge => "CheckBadge",
            Self::ChatBubbleLeftRight => "ChatBubbleLeftRight",
            Self::Trophy => "Trophy",
        }
    }

    /// Accent colour class used when the badge is unlocked.
    pub fn color_class(&self) -> &'static str {
        match self {
            Self::RocketLaunch => "text-green-500",
            Self::Clock => "text-blue-500",
            Self::ShieldCheck => "text-indigo-500",
            Self::Fire => "text-red-500",
            Self::ArrowTrendingUp => "text-emerald-500",
            Self::CalendarDays => "text-purple-500",
            Self::CheckBadge => "text-yellow-500",
            Self::ChatBubbleLeftRight => "text-cyan-500",
            Self::Trophy => "text-gray-500",
        }
    }
}

impl Default for IconKey {
    fn default() -> Self {
        Self::Trophy
    }
}

/// Static description of one achievement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AchievementDefinition {
    #[serde(rename = "type")]
    pub achievement_type: AchievementType,
    pub name: &'static str,
    pub description: &'static str,
    pub icon: IconKey,
}

const CATALOG: [AchievementDefinition; 9] = [
    AchievementDefinition {
        achievement_type: AchievementType::FirstSubmission,
        name: "First Steps",
        description: "Congratulations on making your very first submission!",
        icon: IconKey::RocketLaunch,
    },
    AchievementDefinition {
        achievement_type: AchievementType::OnTimeSubmission,
        name: "Punctual Pro",
        description: "Submitted an assignment before the deadline.",
        icon: IconKey::Clock,
    },
    AchievementDefinition {
        achievement_type: AchievementType::IntegrityAce,
        name: "Integrity Ace",
        description: "Achieved a combined plagiarism and AI score below 10% on a report.",
        icon: IconKey::ShieldCheck,
    },
    AchievementDefinition {
        achievement_type: AchievementType::Streak3,
        name: "Originality Streak x3",
        description: "Maintained a plagiarism score below 20% for 3 consecutive reports.",
        icon: IconKey::Fire,
    },
    AchievementDefinition {
        achievement_type: AchievementType::Streak5,
        name: "Originality Streak x5",
        description: "Maintained a plagiarism score below 20% for 5 consecutive reports.",
        icon: IconKey::Fire,
    },
    AchievementDefinition {
        achievement_type: AchievementType::MostImproved,
        name: "Most Improved",
        description:
            "Significantly lowered your plagiarism score compared to a previous submission.",
        icon: IconKey::ArrowTrendingUp,
    },
    AchievementDefinition {
        achievement_type: AchievementType::ProactivePlanner,
        name: "Proactive Planner",
        description: "Submitted an assignment more than 48 hours before the deadline.",
        icon: IconKey::CalendarDays,
    },
    AchievementDefinition {
        achievement_type: AchievementType::PerfectScore,
        name: "Perfect Score",
        description: "Achieved 0% plagiarism and 0% AI score on a report.",
        icon: IconKey::CheckBadge,
    },
    AchievementDefinition {
        achievement_type: AchievementType::FeedbackProvider,
        name: "Feedback Provider",
        description: "Engaged with your report by providing feedback.",
        icon: IconKey::ChatBubbleLeftRight,
    },
];

/// All definitions in display order.
pub fn all() -> &'static [AchievementDefinition] {
    &CATALOG
}

/// Look up the definition for a type.
pub fn definition(achievement_type: AchievementType) -> &'static AchievementDefinition {
    // CATALOG is declared in enum order, one entry per variant.
    &CATALOG[achievement_type as usize]
}

/// A badge a user has unlocked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "camelCase")]
pub struct Achievement {
    /// Unique identifier, assigned at unlock time
    pub id: String,
    /// Which badge this is
    #[serde(rename = "type")]
    pub achievement_type: AchievementType,
    /// When it was unlocked
    pub unlocked_at: DateTime<Utc>,
}

impl Achievement {
    /// Unlock a new achievement of the given type.
    pub fn unlock(achievement_type: AchievementType, unlocked_at: DateTime<Utc>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            achievement_type,
            unlocked_at,
        }
    }

    pub fn definition(&self) -> &'static AchievementDefinition {
        definition(self.achievement_type)
    }

    pub fn name(&self) -> &'static str {
        self.definition().name
    }
}

/// Whether `achievements` contains one of the given type.
pub fn holds(achievements: &[Achievement], achievement_type: AchievementType) -> bool {
    achievements
        .iter()
        .any(|a| a.achievement_type == achievement_type)
}

/// One row of a user's badge board.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BadgeStatus {
    pub definition: &'static AchievementDefinition,
    /// Set when the user holds this badge
    pub unlocked_at: Option<DateTime<Utc>>,
}

impl BadgeStatus {
    pub fn is_unlocked(&self) -> bool {
        self.unlocked_at.is_some()
    }

    /// Colour class to render the icon with; locked badges are greyed out.
    pub fn color_class(&self) -> &'static str {
        if self.is_unlocked() {
            self.definition.icon.color_class()
        } else {
            "text-gray-400"
        }
    }
}

/// Every catalog badge in order, marked locked or unlocked for a user.
pub fn badge_board(unlocked: &[Achievement]) -> Vec<BadgeStatus> {
    CATALOG
        .iter()
        .map(|definition| BadgeStatus {
            definition,
            unlocked_at: unlocked
                .iter()
                .find(|a| a.achievement_type == definition.achievement_type)
                .map(|a| a.unlocked_at),
        })
        .collect()
}
