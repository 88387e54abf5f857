//! Achievement engine for EduVerify
//!
//! Decides which badges a student unlocks as their activity accumulates:
//!
//! - **Submissions**: first submission, on-time and well-ahead-of-deadline hand-ins
//! - **Reports**: low plagiarism/AI scores, originality streaks, improvement over time
//! - **Feedback**: engaging with a published report
//!
//! # Key Components
//!
//! - [`catalog`]: The nine achievement definitions and the badge board view
//! - [`AchievementEngine`]: Pure evaluation of a [`Trigger`] against an [`ActivitySnapshot`]
//! - [`Notification`]: Records emitted for every newly unlocked achievement
//! - [`EngineConfig`]: Rule thresholds, loadable from YAML
//!
//! # Example
//!
//! ```ignore
//! use achievements::{AchievementEngine, Trigger};
//!
//! let engine = AchievementEngine::new();
//! let result = engine.evaluate(&snapshot, "student1", &Trigger::Feedback, &prior);
//! store.save(&result.final_achievements)?;
//! inbox.append(result.notifications);
//! ```

pub mod catalog;
pub mod config;
pub mod engine;
pub mod error;
pub mod notification;
pub mod types;

// Re-export main types
pub use catalog::{Achievement, AchievementDefinition, AchievementType, BadgeStatus, IconKey};
pub use config::EngineConfig;
pub use engine::{AchievementEngine, Evaluation, Trigger};
pub use error::{AchievementError, Result};
pub use notification::{Notification, NotificationType};
pub use types::*;
