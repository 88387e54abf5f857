//! Core records the achievement engine reads and produces.
//!
//! These mirror the rows the surrounding application keeps for users,
//! assignments, submissions, analysis reports and feedback. Field names
//! serialize in camelCase to match the stored JSON representation.
//!
//! With the `typescript` feature enabled, these types can be exported to
//! TypeScript using ts-rs for the web frontend.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[cfg(feature = "typescript")]
use ts_rs::TS;

/// Role of an account in the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    Teacher,
    Student,
}

impl Default for Role {
    fn default() -> Self {
        Self::Student
    }
}

/// An account visible to the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Login email
    pub email: String,
    /// Account role
    #[serde(default)]
    pub role: Role,
}

/// An assignment set by a teacher for a class.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    /// Unique identifier
    pub id: String,
    /// Owning class
    pub class_id: String,
    /// Title shown to students
    pub title: String,
    /// Submission deadline
    pub deadline: DateTime<Utc>,
}

/// A document handed in by a student.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    /// Unique identifier
    pub id: String,
    /// Assignment this submission answers
    pub assignment_id: String,
    /// Submitting student
    pub student_id: String,
    /// Original file name
    pub file_name: String,
    /// When the file was handed in
    pub submitted_at: DateTime<Utc>,
    /// Analysis report, once one has been generated
    #[serde(default)]
    pub report_id: Option<String>,
}

/// Visibility of an analysis report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReportStatus {
    /// Generated but only visible to the teacher
    Pending,
    /// Released to the student
    Published,
}

/// Result of the content analysis for one submission.
///
/// Scores are percentages in `0.0..=100.0` as produced by the analysis
/// service; the engine treats them as opaque numbers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "camelCase")]
pub struct Report {
    /// Unique identifier
    pub id: String,
    /// Submission that was analysed
    pub submission_id: String,
    /// Share of the text matched to other sources
    pub plagiarism_score: f32,
    /// Likelihood the text was machine generated
    pub ai_content_score: f32,
    /// Free-form summary from the analysis service
    #[serde(default)]
    pub analysis_summary: String,
    /// Current visibility
    pub status: ReportStatus,
    /// When the analysis finished
    pub generated_at: DateTime<Utc>,
}

impl Report {
    pub fn is_published(&self) -> bool {
        self.status == ReportStatus::Published
    }
}

/// A student's response to a published report.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "camelCase")]
pub struct Feedback {
    /// Unique identifier
    pub id: String,
    /// Report being discussed
    pub report_id: String,
    /// Student who wrote it
    pub student_id: String,
    /// Teacher it is addressed to
    pub teacher_id: String,
    /// Message body
    pub message: String,
    /// When it was written
    pub timestamp: DateTime<Utc>,
}

/// Everything the engine may look at during one evaluation.
///
/// The snapshot must already contain the record of the event being
/// evaluated (the new submission, the published report or the new
/// feedback row). The engine never mutates it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivitySnapshot {
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub assignments: Vec<Assignment>,
    #[serde(default)]
    pub submissions: Vec<Submission>,
    #[serde(default)]
    pub reports: Vec<Report>,
    #[serde(default)]
    pub feedback: Vec<Feedback>,
}

impl ActivitySnapshot {
    /// Create an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn user(&self, user_id: &str) -> Option<&User> {
        self.users.iter().find(|u| u.id == user_id)
    }

    pub fn assignment(&self, assignment_id: &str) -> Option<&Assignment> {
        self.assignments.iter().find(|a| a.id == assignment_id)
    }

    pub fn submission(&self, submission_id: &str) -> Option<&Submission> {
        self.submissions.iter().find(|s| s.id == submission_id)
    }

    pub fn report(&self, report_id: &str) -> Option<&Report> {
        self.reports.iter().find(|r| r.id == report_id)
    }

    /// Submissions handed in by a student.
    pub fn submissions_by<'a>(&'a self, user_id: &'a str) -> impl Iterator<Item = &'a Submission> {
        self.submissions.iter().filter(move |s| s.student_id == user_id)
    }

    /// Feedback rows written by a student.
    pub fn feedback_by<'a>(&'a self, user_id: &'a str) -> impl Iterator<Item = &'a Feedback> {
        self.feedback.iter().filter(move |f| f.student_id == user_id)
    }

    /// Student that owns a report, resolved through its submission.
    ///
    /// Returns `None` when the report or its submission is missing.
    pub fn report_owner(&self, report_id: &str) -> Option<&str> {
        let report = self.report(report_id)?;
        self.submission(&report.submission_id)
            .map(|s| s.student_id.as_str())
    }
}
