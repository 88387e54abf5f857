//! Ledger integration tests
//!
//! Drives a student through submissions, report publication and feedback
//! and checks what ends up committed and delivered.

use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};
use futures::future::join_all;
use tokio_test::assert_ok;

use achievement_ledger::{AchievementLedger, InMemoryNotificationSink, LedgerError};
use achievements::{
    AchievementEngine, AchievementType, Assignment, Feedback, Report, ReportStatus, Role,
    Submission, User,
};

const STUDENT: &str = "student1";

fn deadline() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 11, 15, 23, 59, 59).unwrap()
}

fn submission(n: u32, submitted_at: DateTime<Utc>) -> Submission {
    Submission {
        id: format!("sub{n}"),
        assignment_id: "assign1".to_string(),
        student_id: STUDENT.to_string(),
        file_name: format!("draft-{n}.txt"),
        submitted_at,
        report_id: None,
    }
}

fn pending_report(n: u32, plagiarism: f32, ai: f32) -> Report {
    Report {
        id: format!("report{n}"),
        submission_id: format!("sub{n}"),
        plagiarism_score: plagiarism,
        ai_content_score: ai,
        analysis_summary: "Mostly original work.".to_string(),
        status: ReportStatus::Pending,
        generated_at: deadline() + Duration::hours(n as i64),
    }
}

fn feedback(n: u32) -> Feedback {
    Feedback {
        id: format!("fb{n}"),
        report_id: "report1".to_string(),
        student_id: STUDENT.to_string(),
        teacher_id: "teacher1".to_string(),
        message: "Thank you for the feedback.".to_string(),
        timestamp: deadline() + Duration::days(1),
    }
}

async fn setup() -> (AchievementLedger, Arc<InMemoryNotificationSink>) {
    let sink = Arc::new(InMemoryNotificationSink::new());
    let ledger = AchievementLedger::new(AchievementEngine::new(), sink.clone());

    assert_ok!(
        ledger
            .register_user(User {
                id: STUDENT.to_string(),
                name: "Alex Johnson".to_string(),
                email: "alex@example.edu".to_string(),
                role: Role::Student,
            })
            .await
    );
    assert_ok!(
        ledger
            .add_assignment(Assignment {
                id: "assign1".to_string(),
                class_id: "class1".to_string(),
                title: "Schrödinger Equation Analysis".to_string(),
                deadline: deadline(),
            })
            .await
    );

    (ledger, sink)
}

/// Submit, store and publish one report with the given scores.
async fn publish_scored(
    ledger: &AchievementLedger,
    n: u32,
    plagiarism: f32,
    ai: f32,
) -> Vec<AchievementType> {
    assert_ok!(ledger.record_submission(submission(n, deadline())).await);
    assert_ok!(ledger.add_report(pending_report(n, plagiarism, ai)).await);
    let result = assert_ok!(ledger.publish_report(&format!("report{n}")).await);
    result.unlocked_types()
}

#[tokio::test]
async fn test_first_submission_flow() {
    let (ledger, sink) = setup().await;

    let result = assert_ok!(
        ledger
            .record_submission(submission(1, deadline() - Duration::days(3)))
            .await
    );

    assert_eq!(
        result.unlocked_types(),
        vec![
            AchievementType::FirstSubmission,
            AchievementType::OnTimeSubmission,
            AchievementType::ProactivePlanner,
        ]
    );

    let messages: Vec<String> = sink
        .for_user(STUDENT)
        .await
        .into_iter()
        .map(|n| n.message)
        .collect();
    assert_eq!(
        messages,
        vec![
            "Achievement Unlocked: First Steps!",
            "Achievement Unlocked: Punctual Pro!",
            "Achievement Unlocked: Proactive Planner!",
        ]
    );
}

#[tokio::test]
async fn test_pending_report_does_not_count() {
    let (ledger, _sink) = setup().await;

    assert_ok!(ledger.record_submission(submission(1, deadline())).await);
    assert_ok!(ledger.add_report(pending_report(1, 0.0, 0.0)).await);

    let held: Vec<_> = ledger
        .achievements(STUDENT)
        .into_iter()
        .map(|a| a.achievement_type)
        .collect();
    assert!(!held.contains(&AchievementType::PerfectScore));

    let snapshot = ledger.snapshot().await;
    assert_eq!(snapshot.submissions[0].report_id.as_deref(), Some("report1"));
}

#[tokio::test]
async fn test_streak_supersession_through_ledger() {
    let (ledger, sink) = setup().await;
    let scores = [15.0, 18.0, 10.0, 19.0, 5.0];

    let mut unlocks = Vec::new();
    for (i, score) in scores.iter().enumerate() {
        unlocks.push(publish_scored(&ledger, i as u32 + 1, *score, 40.0).await);
    }

    assert_eq!(unlocks[2], vec![AchievementType::Streak3]);
    assert_eq!(unlocks[4], vec![AchievementType::Streak5]);

    let held: Vec<_> = ledger
        .achievements(STUDENT)
        .into_iter()
        .map(|a| a.achievement_type)
        .collect();
    assert!(held.contains(&AchievementType::Streak5));
    assert!(!held.contains(&AchievementType::Streak3));

    // Both unlock notices were delivered even though the short streak is gone.
    let streak_notices = sink
        .for_user(STUDENT)
        .await
        .into_iter()
        .filter(|n| n.message.contains("Originality Streak"))
        .count();
    assert_eq!(streak_notices, 2);
}

#[tokio::test]
async fn test_perfect_report_and_improvement() {
    let (ledger, _sink) = setup().await;

    let first = publish_scored(&ledger, 1, 60.0, 30.0).await;
    assert!(first.is_empty());

    let second = publish_scored(&ledger, 2, 0.0, 0.0).await;
    assert_eq!(
        second,
        vec![
            AchievementType::IntegrityAce,
            AchievementType::PerfectScore,
            AchievementType::MostImproved,
        ]
    );
}

#[tokio::test]
async fn test_badge_board_after_activity() {
    let (ledger, _sink) = setup().await;
    assert_ok!(ledger.record_feedback(feedback(1)).await);

    let board = ledger.badge_board(STUDENT);
    assert_eq!(board.len(), 9);

    let unlocked: Vec<_> = board
        .iter()
        .filter(|b| b.is_unlocked())
        .map(|b| b.definition.achievement_type)
        .collect();
    assert_eq!(unlocked, vec![AchievementType::FeedbackProvider]);
}

#[tokio::test]
async fn test_concurrent_feedback_unlocks_once() {
    let (ledger, sink) = setup().await;

    let results = join_all((1..=10).map(|n| ledger.record_feedback(feedback(n)))).await;

    let unlocked: usize = results
        .into_iter()
        .map(|r| assert_ok!(r).newly_unlocked.len())
        .sum();
    assert_eq!(unlocked, 1);
    assert_eq!(ledger.achievements(STUDENT).len(), 1);
    assert_eq!(sink.len().await, 1);
    assert_eq!(ledger.snapshot().await.feedback.len(), 10);
}

#[tokio::test]
async fn test_concurrent_submissions_unlock_first_once() {
    let (ledger, _sink) = setup().await;

    let results = join_all((1..=5).map(|n| ledger.record_submission(submission(n, deadline())))).await;
    for result in results {
        assert_ok!(result);
    }

    let held: Vec<_> = ledger
        .achievements(STUDENT)
        .into_iter()
        .map(|a| a.achievement_type)
        .collect();
    assert_eq!(
        held,
        vec![AchievementType::FirstSubmission, AchievementType::OnTimeSubmission]
    );
}

#[tokio::test]
async fn test_report_for_unknown_submission() {
    let (ledger, _sink) = setup().await;

    let result = ledger.add_report(pending_report(9, 5.0, 5.0)).await;
    assert!(matches!(result, Err(LedgerError::UnknownSubmission(_))));
}
