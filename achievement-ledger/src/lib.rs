//! Activity ledger for the achievement engine.
//!
//! Owns the activity records and each user's unlocked achievements, and
//! applies the "record event, evaluate, commit" sequence for every
//! submission, report publication and feedback entry:
//!
//! - **Per-user serialization**: two events for the same user never evaluate
//!   against each other's stale achievement set
//! - **Commit**: the engine's final achievement set replaces the stored one
//! - **Delivery**: unlock notifications go to a [`NotificationSink`]
//!
//! # Example
//!
//! ```ignore
//! use achievement_ledger::{AchievementLedger, InMemoryNotificationSink};
//!
//! let sink = Arc::new(InMemoryNotificationSink::new());
//! let ledger = AchievementLedger::new(AchievementEngine::new(), sink.clone());
//! ledger.register_user(student).await?;
//! ledger.add_assignment(assignment).await?;
//! let result = ledger.record_submission(submission).await?;
//! ```

pub mod error;
pub mod ledger;
pub mod sink;

// Re-export main types
pub use error::{LedgerError, Result};
pub use ledger::AchievementLedger;
pub use sink::{InMemoryNotificationSink, NotificationSink};
