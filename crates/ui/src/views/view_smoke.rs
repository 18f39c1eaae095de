use std::collections::BTreeMap;
use std::time::Duration;

use dioxus::prelude::{ReadableExt, WritableExt};
use gaps_core::dashboard::NO_STUDENTS_MESSAGE;
use gaps_core::model::{
    ConceptStats, Dashboard, DashboardSummary, Question, QuestionDraft, QuestionId, RiskLevel,
    StudentId, StudentOverview,
};
use services::InMemoryBackend;
use gaps_core::quiz::QuizPhase;
use services::api::StatusCode;

use super::quiz::QuizHandles;
use super::test_harness::{ViewHarness, ViewKind, setup_view_harness};

const SETTLE: Duration = Duration::from_millis(100);

fn question(id: u64, text: &str) -> Question {
    QuestionDraft {
        text: text.into(),
        concept: "Fractions".into(),
        options: vec!["1/2".into(), "1/3".into(), "1/4".into(), "2/3".into()],
        correct_answer: Some(0),
    }
    .validate(QuestionId::new(id))
    .unwrap()
}

fn phase(harness: &ViewHarness, quiz: QuizHandles) -> QuizPhase {
    harness.in_runtime(|| quiz.controller.peek().phase())
}

fn ticking(harness: &ViewHarness, quiz: QuizHandles) -> bool {
    harness.in_runtime(|| quiz.ticker.peek().is_active())
}

fn answer_first_option(harness: &ViewHarness, quiz: QuizHandles) {
    harness.in_runtime(|| {
        let mut controller = quiz.controller;
        controller.write().select_option(0).unwrap();
        quiz.submit.call(());
    });
}

fn class_of_two() -> Dashboard {
    let mut concept_analysis = BTreeMap::new();
    concept_analysis.insert(
        "Fractions".to_string(),
        ConceptStats {
            total_students: 2,
            avg_gap_score: 0.55,
            at_risk_count: 1,
        },
    );
    Dashboard {
        summary: DashboardSummary {
            total_students: 2,
            at_risk_students: 1,
            watch_students: 1,
            safe_students: 0,
        },
        students: vec![
            StudentOverview {
                student_id: StudentId::new("s-ada").unwrap(),
                overall_risk: RiskLevel::AtRisk,
                overall_score: 0.72,
                timestamp: None,
                top_concerns: vec!["Possible AI assistance".into()],
            },
            StudentOverview {
                student_id: StudentId::new("s-bo").unwrap(),
                overall_risk: RiskLevel::Watch,
                overall_score: 0.38,
                timestamp: None,
                top_concerns: Vec::new(),
            },
        ],
        concept_analysis,
    }
}

#[tokio::test(flavor = "current_thread")]
async fn dashboard_without_students_shows_placeholder() {
    let mut harness = setup_view_harness(ViewKind::Dashboard, InMemoryBackend::new());
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains(NO_STUDENTS_MESSAGE), "missing placeholder in {html}");
    assert!(!html.contains("student-table"), "table rendered for empty class: {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn dashboard_renders_rows_and_analysis() {
    let backend = InMemoryBackend::new().with_dashboard(class_of_two());
    let mut harness = setup_view_harness(ViewKind::Dashboard, backend);
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("s-ada"), "missing first student in {html}");
    assert!(html.contains("s-bo"), "missing second student in {html}");
    assert!(html.contains("AT RISK"), "missing risk badge in {html}");
    assert!(html.contains("60%"), "missing ai likelihood in {html}");
    assert!(html.contains("No major concerns"), "missing concerns fallback in {html}");
    assert!(html.contains("Concept Analysis"), "missing concept section in {html}");
    assert!(html.contains("Live updates off"), "missing live toggle in {html}");
    assert!(harness.backend.dashboard_loads() >= 1);
}

#[tokio::test(flavor = "current_thread")]
async fn dashboard_failure_offers_retry() {
    let backend = InMemoryBackend::new();
    backend.set_failing(Some(StatusCode::INTERNAL_SERVER_ERROR));
    let mut harness = setup_view_harness(ViewKind::Dashboard, backend);
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("Could not reach the analysis server"), "missing error in {html}");
    assert!(html.contains("Retry"), "missing retry in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn quiz_starts_with_student_id_prompt() {
    let backend = InMemoryBackend::new().with_questions(vec![question(1, "Half of one?")]);
    let mut harness = setup_view_harness(ViewKind::Quiz, backend);
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("Student ID"), "missing id field in {html}");
    assert!(html.contains("Start Quiz"), "missing start button in {html}");
    assert!(!html.contains("Half of one?"), "question shown before start: {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn login_defaults_to_student_login() {
    let mut harness = setup_view_harness(ViewKind::Login, InMemoryBackend::new());
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("Student Login"), "missing title in {html}");
    assert!(html.contains("Log In"), "missing submit in {html}");
    assert!(!html.contains("Password strength"), "strength meter on login tab: {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn quiz_setup_lists_saved_questions() {
    let backend = InMemoryBackend::new()
        .with_questions(vec![question(1, "Half of one?"), question(4, "A third of three?")]);
    let mut harness = setup_view_harness(ViewKind::QuizSetup, backend);
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("Q1. Half of one?"), "missing first question in {html}");
    assert!(html.contains("Q2. A third of three?"), "missing second question in {html}");
    assert!(html.contains("2 questions"), "missing count in {html}");
    assert!(html.contains("Add Question"), "missing add button in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn quiz_setup_starts_empty_bank() {
    let mut harness = setup_view_harness(ViewKind::QuizSetup, InMemoryBackend::new());
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("No questions yet"), "missing empty hint in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn question_ticker_runs_only_while_presenting() {
    let backend = InMemoryBackend::new()
        .with_questions(vec![question(1, "Half of one?"), question(2, "A third of three?")]);
    let mut harness = setup_view_harness(ViewKind::Quiz, backend);
    harness.settle().await;
    let quiz = harness.quiz();
    assert!(!ticking(&harness, quiz));

    harness.in_runtime(|| quiz.start.call("s-ada".to_string()));
    harness.drive_for(SETTLE).await;
    assert_eq!(phase(&harness, quiz), QuizPhase::Presenting { index: 0 });
    assert!(ticking(&harness, quiz), "no ticker on the first question");
    assert!(harness.render().contains("Half of one?"));

    answer_first_option(&harness, quiz);
    harness.drive_async().await;
    assert_eq!(phase(&harness, quiz), QuizPhase::Presenting { index: 1 });
    assert!(ticking(&harness, quiz), "ticker lost between questions");

    answer_first_option(&harness, quiz);
    assert!(!ticking(&harness, quiz), "ticker outlived the last answer");
    harness.drive_for(SETTLE).await;
    assert_eq!(phase(&harness, quiz), QuizPhase::Results);
    assert!(!ticking(&harness, quiz));
    assert_eq!(harness.backend.submissions().len(), 1);
    assert!(harness.render().contains("Take Another Quiz"));

    harness.in_runtime(|| quiz.retake.call(()));
    harness.drive_async().await;
    assert_eq!(phase(&harness, quiz), QuizPhase::LoggedOut);
    assert!(!ticking(&harness, quiz), "ticker restarted by retake");
}

#[tokio::test(flavor = "current_thread")]
async fn question_ticker_stops_on_errors_and_resumes_after_retry() {
    let backend = InMemoryBackend::new().with_questions(vec![question(1, "Half of one?")]);
    backend.set_failing(Some(StatusCode::INTERNAL_SERVER_ERROR));
    let mut harness = setup_view_harness(ViewKind::Quiz, backend);
    harness.settle().await;
    let quiz = harness.quiz();

    harness.in_runtime(|| quiz.start.call("s-ada".to_string()));
    harness.drive_for(SETTLE).await;
    assert_eq!(phase(&harness, quiz), QuizPhase::Error);
    assert!(!ticking(&harness, quiz), "ticker running after a failed load");
    assert!(harness.render().contains("Retry"));

    harness.backend.set_failing(None);
    harness.in_runtime(|| quiz.retry.call(()));
    harness.drive_for(SETTLE).await;
    assert_eq!(phase(&harness, quiz), QuizPhase::Presenting { index: 0 });
    assert!(ticking(&harness, quiz), "retry did not restart the ticker");

    harness.backend.set_failing(Some(StatusCode::BAD_GATEWAY));
    answer_first_option(&harness, quiz);
    harness.drive_for(SETTLE).await;
    assert_eq!(phase(&harness, quiz), QuizPhase::Error);
    assert!(!ticking(&harness, quiz), "ticker running after a failed submission");
}

#[tokio::test(flavor = "current_thread")]
async fn live_refresh_stops_when_toggled_off_or_unmounted() {
    let backend = InMemoryBackend::new().with_dashboard(class_of_two());
    let mut harness = setup_view_harness(ViewKind::Dashboard, backend);
    harness.settle().await;
    let dashboard = harness.dashboard();
    let live = |harness: &ViewHarness| harness.in_runtime(|| dashboard.live.peek().is_active());
    let initial = harness.backend.dashboard_loads();

    harness.in_runtime(|| dashboard.toggle_live.call(()));
    harness.drive_for(SETTLE).await;
    assert!(live(&harness));
    assert!(harness.render().contains("Live updates on"));
    assert!(harness.backend.dashboard_loads() > initial, "live refresh never polled");

    harness.in_runtime(|| dashboard.toggle_live.call(()));
    harness.drive_async().await;
    assert!(!live(&harness));
    assert!(harness.render().contains("Live updates off"));
    let stopped = harness.backend.dashboard_loads();
    harness.drive_for(SETTLE).await;
    assert_eq!(harness.backend.dashboard_loads(), stopped, "polling after toggle off");

    harness.in_runtime(|| dashboard.toggle_live.call(()));
    harness.drive_for(SETTLE).await;
    assert!(harness.backend.dashboard_loads() > stopped);

    harness.show(ViewKind::Login);
    harness.drive_async().await;
    assert!(harness.render().contains("Student Login"));
    let unmounted = harness.backend.dashboard_loads();
    harness.drive_for(SETTLE).await;
    assert_eq!(harness.backend.dashboard_loads(), unmounted, "polling after unmount");
}
