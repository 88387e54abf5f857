//! The achievement rule engine.
//!
//! Evaluation is a pure function of an [`ActivitySnapshot`], the acting user,
//! the [`Trigger`] that fired and the user's previously unlocked
//! achievements. It returns the new achievement set and the notifications to
//! deliver; persisting either is the caller's job.
//!
//! Rules run in a fixed order per trigger and every rule is checked on every
//! call, so one event can unlock several badges. A badge the user already
//! holds is never unlocked twice. The only removal is the short originality
//! streak, which is replaced when the long streak is granted.

use std::collections::HashSet;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::catalog::{holds, Achievement, AchievementType};
use crate::config::EngineConfig;
use crate::error::Result;
use crate::notification::{unlock_notifications, Notification};
use crate::types::{ActivitySnapshot, Assignment, Report, Submission};

/// The event that caused an evaluation, with its payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "trigger", rename_all = "snake_case")]
pub enum Trigger {
    /// A submission was recorded for an assignment
    Submission {
        submission: Submission,
        assignment: Assignment,
    },
    /// A report was published; `report` already carries its new status
    Report { report: Report },
    /// The user wrote feedback; the new row is in the snapshot
    Feedback,
}

impl Trigger {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Submission { .. } => "submission",
            Self::Report { .. } => "report",
            Self::Feedback => "feedback",
        }
    }
}

/// Outcome of one evaluation pass.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Evaluation {
    /// False when the user is not in the snapshot; nothing else is set then
    pub user_found: bool,
    /// Prior achievements, minus superseded ones, plus new unlocks
    pub final_achievements: Vec<Achievement>,
    /// Achievements unlocked by this pass, in rule order
    pub newly_unlocked: Vec<Achievement>,
    /// One notification per entry of `newly_unlocked`
    pub notifications: Vec<Notification>,
}

impl Evaluation {
    /// Result for a user the snapshot does not know.
    pub fn unknown_user() -> Self {
        Self::default()
    }

    /// Types unlocked by this pass, in unlock order.
    pub fn unlocked_types(&self) -> Vec<AchievementType> {
        self.newly_unlocked
            .iter()
            .map(|a| a.achievement_type)
            .collect()
    }

    /// Whether this pass unlocked anything.
    pub fn has_unlocks(&self) -> bool {
        !self.newly_unlocked.is_empty()
    }
}

/// Decides which achievements unlock for an activity event.
#[derive(Debug, Clone, Default)]
pub struct AchievementEngine {
    config: EngineConfig,
}

impl AchievementEngine {
    /// Create an engine with the default thresholds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an engine with custom thresholds.
    pub fn with_config(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Evaluate a trigger at the current time.
    pub fn evaluate(
        &self,
        snapshot: &ActivitySnapshot,
        user_id: &str,
        trigger: &Trigger,
        prior: &[Achievement],
    ) -> Evaluation {
        self.evaluate_at(snapshot, user_id, trigger, prior, Utc::now())
    }

    /// Evaluate a trigger, stamping unlocks and notifications with `now`.
    pub fn evaluate_at(
        &self,
        snapshot: &ActivitySnapshot,
        user_id: &str,
        trigger: &Trigger,
        prior: &[Achievement],
        now: DateTime<Utc>,
    ) -> Evaluation {
        if snapshot.user(user_id).is_none() {
            warn!(user_id = %user_id, trigger = trigger.as_str(), "User not in snapshot, skipping achievements");
            return Evaluation::unknown_user();
        }

        let mut current = prior.to_vec();

        let candidates = match trigger {
            Trigger::Submission {
                submission,
                assignment,
            } => self.submission_rules(snapshot, user_id, submission, assignment, &current),
            Trigger::Report { report } => self.report_rules(snapshot, user_id, report, &mut current),
            Trigger::Feedback => self.feedback_rules(snapshot, user_id, &current),
        };

        let mut newly_unlocked: Vec<Achievement> = Vec::new();
        for achievement_type in candidates {
            if holds(&current, achievement_type) || holds(&newly_unlocked, achievement_type) {
                continue;
            }
            debug!(
                user_id = %user_id,
                achievement = %achievement_type,
                trigger = trigger.as_str(),
                "Achievement unlocked"
            );
            newly_unlocked.push(Achievement::unlock(achievement_type, now));
        }

        let notifications =
            unlock_notifications(user_id, &newly_unlocked, &self.config.profile_link, now);

        current.extend(newly_unlocked.iter().cloned());

        Evaluation {
            user_found: true,
            final_achievements: current,
            newly_unlocked,
            notifications,
        }
    }

    fn submission_rules(
        &self,
        snapshot: &ActivitySnapshot,
        user_id: &str,
        submission: &Submission,
        assignment: &Assignment,
        held: &[Achievement],
    ) -> Vec<AchievementType> {
        let mut unlocks = Vec::new();

        if snapshot.submissions_by(user_id).count() == 1
            && !holds(held, AchievementType::FirstSubmission)
        {
            unlocks.push(AchievementType::FirstSubmission);
        }

        if submission.submitted_at <= assignment.deadline
            && !holds(held, AchievementType::OnTimeSubmission)
        {
            unlocks.push(AchievementType::OnTimeSubmission);
        }

        // An unrepresentable lead time can never be met.
        let lead_time = assignment.deadline - submission.submitted_at;
        let proactive = Duration::try_hours(self.config.proactive_hours)
            .is_some_and(|required| lead_time >= required);
        if proactive && !holds(held, AchievementType::ProactivePlanner) {
            unlocks.push(AchievementType::ProactivePlanner);
        }

        unlocks
    }

    /// Report rules. Granting the long streak removes the short streak from
    /// `current`.
    fn report_rules(
        &self,
        snapshot: &ActivitySnapshot,
        user_id: &str,
        report: &Report,
        current: &mut Vec<Achievement>,
    ) -> Vec<AchievementType> {
        let cfg = &self.config;
        let mut unlocks = Vec::new();
        let history = published_history(snapshot, user_id, report);

        if report.plagiarism_score < cfg.integrity_ace_below
            && report.ai_content_score < cfg.integrity_ace_below
            && !holds(current, AchievementType::IntegrityAce)
        {
            unlocks.push(AchievementType::IntegrityAce);
        }

        if report.plagiarism_score == 0.0
            && report.ai_content_score == 0.0
            && !holds(current, AchievementType::PerfectScore)
        {
            unlocks.push(AchievementType::PerfectScore);
        }

        let mut relevant: Vec<&Report> = history.clone();
        relevant.push(report);
        if relevant.len() >= cfg.streak_short_len {
            let recent = &relevant[relevant.len().saturating_sub(cfg.streak_long_len)..];
            let unbroken = recent
                .iter()
                .all(|r| r.plagiarism_score < cfg.streak_plagiarism_below);

            if unbroken {
                if recent.len() >= cfg.streak_long_len && !holds(current, AchievementType::Streak5)
                {
                    current.retain(|a| a.achievement_type != AchievementType::Streak3);
                    unlocks.push(AchievementType::Streak5);
                } else if recent.len() >= cfg.streak_short_len
                    && !holds(current, AchievementType::Streak3)
                    && !holds(current, AchievementType::Streak5)
                {
                    unlocks.push(AchievementType::Streak3);
                }
            }
        }

        if let Some(previous) = history.last() {
            if !holds(current, AchievementType::MostImproved)
                && report.plagiarism_score <= previous.plagiarism_score - cfg.most_improved_drop
            {
                unlocks.push(AchievementType::MostImproved);
            }
        }

        unlocks
    }

    fn feedback_rules(
        &self,
        snapshot: &ActivitySnapshot,
        user_id: &str,
        held: &[Achievement],
    ) -> Vec<AchievementType> {
        if snapshot.feedback_by(user_id).count() == 1
            && !holds(held, AchievementType::FeedbackProvider)
        {
            vec![AchievementType::FeedbackProvider]
        } else {
            Vec::new()
        }
    }
}

/// The user's published reports other than `current`, oldest first.
///
/// Ordering is by `generated_at`; ties keep snapshot order.
fn published_history<'a>(
    snapshot: &'a ActivitySnapshot,
    user_id: &str,
    current: &Report,
) -> Vec<&'a Report> {
    let own_submissions: HashSet<&str> = snapshot
        .submissions_by(user_id)
        .map(|s| s.id.as_str())
        .collect();

    let mut history: Vec<&Report> = snapshot
        .reports
        .iter()
        .filter(|r| r.is_published())
        .filter(|r| r.id != current.id)
        .filter(|r| own_submissions.contains(r.submission_id.as_str()))
        .collect();
    history.sort_by_key(|r| r.generated_at);
    history
}
