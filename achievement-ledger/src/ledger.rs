//! In-memory activity ledger.
//!
//! Every activity event follows the same sequence: record the event in the
//! snapshot, evaluate the matching trigger for the acting student, store the
//! resulting achievement set and deliver the unlock notifications. The whole
//! sequence runs under a per-user lock so concurrent events for one student
//! are applied one at a time.

use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};
use tracing::{debug, info, warn};

use achievements::catalog::{self, BadgeStatus};
use achievements::{
    Achievement, AchievementEngine, ActivitySnapshot, Assignment, Evaluation, Feedback, Report,
    ReportStatus, Submission, Trigger, User,
};

use crate::error::{LedgerError, Result};
use crate::sink::NotificationSink;

/// Owns activity records and per-user achievements.
///
/// Per-user locks exist only while an event for that user is in flight.
pub struct AchievementLedger {
    engine: AchievementEngine,
    /// All recorded activity
    activity: Arc<RwLock<ActivitySnapshot>>,
    /// Committed achievement sets by user ID
    achievements: DashMap<String, Vec<Achievement>>,
    /// Serializes apply-evaluate-commit per user
    user_locks: DashMap<String, Arc<Mutex<()>>>,
    sink: Arc<dyn NotificationSink>,
}

impl AchievementLedger {
    /// Create an empty ledger.
    pub fn new(engine: AchievementEngine, sink: Arc<dyn NotificationSink>) -> Self {
        Self::with_snapshot(engine, sink, ActivitySnapshot::new())
    }

    /// Create a ledger seeded with existing activity.
    ///
    /// No achievements are evaluated for the seeded records.
    pub fn with_snapshot(
        engine: AchievementEngine,
        sink: Arc<dyn NotificationSink>,
        snapshot: ActivitySnapshot,
    ) -> Self {
        Self {
            engine,
            activity: Arc::new(RwLock::new(snapshot)),
            achievements: DashMap::new(),
            user_locks: DashMap::new(),
            sink,
        }
    }

    /// Restore a user's previously stored achievements.
    pub fn restore_achievements(&self, user_id: &str, achievements: Vec<Achievement>) {
        self.achievements.insert(user_id.to_string(), achievements);
    }

    pub async fn register_user(&self, user: User) -> Result<()> {
        let mut activity = self.activity.write().await;
        if activity.user(&user.id).is_some() {
            return Err(LedgerError::DuplicateRecord {
                kind: "user",
                id: user.id,
            });
        }
        debug!(user_id = %user.id, "Registered user");
        activity.users.push(user);
        Ok(())
    }

    pub async fn add_assignment(&self, assignment: Assignment) -> Result<()> {
        let mut activity = self.activity.write().await;
        if activity.assignment(&assignment.id).is_some() {
            return Err(LedgerError::DuplicateRecord {
                kind: "assignment",
                id: assignment.id,
            });
        }
        activity.assignments.push(assignment);
        Ok(())
    }

    /// Record a submission and evaluate submission achievements.
    pub async fn record_submission(&self, submission: Submission) -> Result<Evaluation> {
        let user_id = submission.student_id.clone();
        let _guard = self.lock_user(&user_id).await;

        let trigger = {
            let mut activity = self.activity.write().await;
            if activity.submission(&submission.id).is_some() {
                return Err(LedgerError::DuplicateRecord {
                    kind: "submission",
                    id: submission.id,
                });
            }
            let assignment = activity
                .assignment(&submission.assignment_id)
                .cloned()
                .ok_or_else(|| LedgerError::UnknownAssignment(submission.assignment_id.clone()))?;

            activity.submissions.push(submission.clone());
            Trigger::Submission {
                submission,
                assignment,
            }
        };

        self.evaluate_and_commit(&user_id, trigger).await
    }

    /// Store a freshly generated report and link it to its submission.
    ///
    /// Reports only count towards achievements once published.
    pub async fn add_report(&self, report: Report) -> Result<()> {
        let mut activity = self.activity.write().await;
        if activity.report(&report.id).is_some() {
            return Err(LedgerError::DuplicateRecord {
                kind: "report",
                id: report.id,
            });
        }

        let submission = activity
            .submissions
            .iter_mut()
            .find(|s| s.id == report.submission_id)
            .ok_or_else(|| LedgerError::UnknownSubmission(report.submission_id.clone()))?;
        submission.report_id = Some(report.id.clone());

        debug!(report_id = %report.id, submission_id = %report.submission_id, "Stored report");
        activity.reports.push(report);
        Ok(())
    }

    /// Publish a report to its student and evaluate report achievements.
    pub async fn publish_report(&self, report_id: &str) -> Result<Evaluation> {
        let user_id = {
            let activity = self.activity.read().await;
            let report = activity
                .report(report_id)
                .ok_or_else(|| LedgerError::UnknownReport(report_id.to_string()))?;
            activity
                .report_owner(report_id)
                .map(str::to_string)
                .ok_or_else(|| LedgerError::UnknownSubmission(report.submission_id.clone()))?
        };
        let _guard = self.lock_user(&user_id).await;

        let trigger = {
            let mut activity = self.activity.write().await;
            let report = activity
                .reports
                .iter_mut()
                .find(|r| r.id == report_id)
                .ok_or_else(|| LedgerError::UnknownReport(report_id.to_string()))?;
            report.status = ReportStatus::Published;
            Trigger::Report {
                report: report.clone(),
            }
        };

        self.evaluate_and_commit(&user_id, trigger).await
    }

    /// Record feedback on a report and evaluate feedback achievements.
    pub async fn record_feedback(&self, feedback: Feedback) -> Result<Evaluation> {
        let user_id = feedback.student_id.clone();
        let _guard = self.lock_user(&user_id).await;

        {
            let mut activity = self.activity.write().await;
            if activity.feedback.iter().any(|f| f.id == feedback.id) {
                return Err(LedgerError::DuplicateRecord {
                    kind: "feedback",
                    id: feedback.id,
                });
            }
            activity.feedback.push(feedback);
        }

        self.evaluate_and_commit(&user_id, Trigger::Feedback).await
    }

    /// Committed achievements for a user.
    pub fn achievements(&self, user_id: &str) -> Vec<Achievement> {
        self.achievements
            .get(user_id)
            .map(|entry| entry.value().clone())
            .unwrap_or_default()
    }

    /// Catalog-ordered locked/unlocked view for a user.
    pub fn badge_board(&self, user_id: &str) -> Vec<BadgeStatus> {
        catalog::badge_board(&self.achievements(user_id))
    }

    /// Copy of all recorded activity.
    pub async fn snapshot(&self) -> ActivitySnapshot {
        self.activity.read().await.clone()
    }

    async fn evaluate_and_commit(&self, user_id: &str, trigger: Trigger) -> Result<Evaluation> {
        let prior = self.achievements(user_id);
        let evaluation = {
            let activity = self.activity.read().await;
            self.engine.evaluate(&activity, user_id, &trigger, &prior)
        };

        if !evaluation.user_found {
            // Activity stays recorded; there is no achievement set to update.
            return Ok(evaluation);
        }

        self.achievements
            .insert(user_id.to_string(), evaluation.final_achievements.clone());

        if evaluation.has_unlocks() {
            info!(
                user_id = %user_id,
                trigger = trigger.as_str(),
                unlocked = ?evaluation.unlocked_types(),
                "Committed achievement unlocks"
            );
            if let Err(e) = self.sink.deliver(&evaluation.notifications).await {
                warn!(user_id = %user_id, error = %e, "Failed to deliver achievement notifications");
            }
        }

        Ok(evaluation)
    }

    async fn lock_user(&self, user_id: &str) -> UserLock<'_> {
        let lock = self
            .user_locks
            .entry(user_id.to_string())
            .or_default()
            .clone();
        UserLock {
            locks: &self.user_locks,
            user_id: user_id.to_string(),
            guard: Some(lock.lock_owned().await),
        }
    }
}

/// Exclusive hold on one user's events.
///
/// On drop the user's entry is removed from the lock map unless another
/// task still holds or waits on the same mutex.
struct UserLock<'a> {
    locks: &'a DashMap<String, Arc<Mutex<()>>>,
    user_id: String,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for UserLock<'_> {
    fn drop(&mut self) {
        // Release the mutex first so its Arc no longer counts as a holder.
        self.guard.take();
        self.locks
            .remove_if(&self.user_id, |_, lock| Arc::strong_count(lock) == 1);
    }
}
