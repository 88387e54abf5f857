//! Thresholds used by the achievement rules.

use serde::{Deserialize, Serialize};

use crate::error::{AchievementError, Result};

/// Largest accepted `proactive_hours`, one year.
pub const MAX_PROACTIVE_HOURS: i64 = 24 * 365;

/// Tunable thresholds for the achievement engine.
///
/// The defaults are the values the badge descriptions promise to students;
/// changing them changes what the catalog text means.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Plagiarism and AI scores must both be below this for Integrity Ace
    pub integrity_ace_below: f32,
    /// Every report in the streak window must have plagiarism below this
    pub streak_plagiarism_below: f32,
    /// Reports needed for the short streak
    pub streak_short_len: usize,
    /// Reports needed for the long streak, also the window size
    pub streak_long_len: usize,
    /// Minimum plagiarism drop (percentage points) for Most Improved
    pub most_improved_drop: f32,
    /// Hours before the deadline that count as proactive
    pub proactive_hours: i64,
    /// Where achievement notifications link to
    pub profile_link: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            integrity_ace_below: 10.0,
            streak_plagiarism_below: 20.0,
            streak_short_len: 3,
            streak_long_len: 5,
            most_improved_drop: 20.0,
            proactive_hours: 48,
            profile_link: "/dashboard/profile".to_string(),
        }
    }
}

impl EngineConfig {
    /// Load config from YAML.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to YAML.
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Check the thresholds are consistent.
    pub fn validate(&self) -> Result<()> {
        if self.streak_short_len == 0 {
            return Err(AchievementError::InvalidConfig(
                "streak_short_len must be at least 1".to_string(),
            ));
        }
        if self.streak_short_len >= self.streak_long_len {
            return Err(AchievementError::InvalidConfig(format!(
                "streak_short_len ({}) must be less than streak_long_len ({})",
                self.streak_short_len, self.streak_long_len
            )));
        }

        let thresholds = [
            ("integrity_ace_below", self.integrity_ace_below),
            ("streak_plagiarism_below", self.streak_plagiarism_below),
            ("most_improved_drop", self.most_improved_drop),
        ];
        for (name, value) in thresholds {
            if !value.is_finite() || value < 0.0 {
                return Err(AchievementError::InvalidConfig(format!(
                    "{name} must be a non-negative number, got {value}"
                )));
            }
        }

        if !(0..=MAX_PROACTIVE_HOURS).contains(&self.proactive_hours) {
            return Err(AchievementError::InvalidConfig(format!(
                "proactive_hours must be between 0 and {MAX_PROACTIVE_HOURS}, got {}",
                self.proactive_hours
            )));
        }

        Ok(())
    }
}
