use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use reqwest::StatusCode;

use gaps_core::model::{
    Analysis, AuthUser, Dashboard, LoginRequest, Question, SignupRequest, StudentDetail, StudentId,
};
use gaps_core::quiz::QuizSubmission;

use super::{AuthResponse, QuizBackend};
use crate::error::ApiError;

#[derive(Debug, Default)]
struct BackendState {
    questions: Vec<Question>,
    analysis: Analysis,
    dashboard: Dashboard,
    details: Vec<StudentDetail>,
    auth: Option<AuthResponse>,
    failing: Option<StatusCode>,
    submissions: Vec<QuizSubmission>,
    saved: Vec<Vec<Question>>,
    resets: usize,
    dashboard_loads: usize,
}

/// Canned backend for tests and offline demos.
///
/// Clones share state, so a test can keep a handle and inspect what the code
/// under test sent.
#[derive(Clone, Default)]
pub struct InMemoryBackend {
    state: Arc<Mutex<BackendState>>,
}

impl InMemoryBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, BackendState> {
        self.state
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn check(&self) -> Result<(), ApiError> {
        match self.lock().failing {
            Some(status) => Err(ApiError::HttpStatus(status)),
            None => Ok(()),
        }
    }

    #[must_use]
    pub fn with_questions(self, questions: Vec<Question>) -> Self {
        self.lock().questions = questions;
        self
    }

    #[must_use]
    pub fn with_analysis(self, analysis: Analysis) -> Self {
        self.lock().analysis = analysis;
        self
    }

    #[must_use]
    pub fn with_dashboard(self, dashboard: Dashboard) -> Self {
        self.lock().dashboard = dashboard;
        self
    }

    #[must_use]
    pub fn with_detail(self, detail: StudentDetail) -> Self {
        self.lock().details.push(detail);
        self
    }

    /// Response returned by both login and signup.
    #[must_use]
    pub fn with_auth_response(self, response: AuthResponse) -> Self {
        self.lock().auth = Some(response);
        self
    }

    /// Every call fails with `status` until cleared with `None`.
    pub fn set_failing(&self, status: Option<StatusCode>) {
        self.lock().failing = status;
    }

    #[must_use]
    pub fn submissions(&self) -> Vec<QuizSubmission> {
        self.lock().submissions.clone()
    }

    #[must_use]
    pub fn saved_question_sets(&self) -> Vec<Vec<Question>> {
        self.lock().saved.clone()
    }

    #[must_use]
    pub fn reset_count(&self) -> usize {
        self.lock().resets
    }

    #[must_use]
    pub fn dashboard_loads(&self) -> usize {
        self.lock().dashboard_loads
    }

    fn auth_for(&self, user: AuthUser) -> AuthResponse {
        self.lock().auth.clone().unwrap_or_else(|| AuthResponse {
            success: true,
            message: "ok".to_string(),
            token: Some("memory-token".to_string()),
            user: Some(user),
        })
    }
}

#[async_trait]
impl QuizBackend for InMemoryBackend {
    async fn fetch_questions(&self) -> Result<Vec<Question>, ApiError> {
        self.check()?;
        Ok(self.lock().questions.clone())
    }

    async fn submit_quiz(&self, submission: &QuizSubmission) -> Result<Analysis, ApiError> {
        self.check()?;
        let mut state = self.lock();
        state.submissions.push(submission.clone());
        Ok(state.analysis.clone())
    }

    async fn fetch_dashboard(&self) -> Result<Dashboard, ApiError> {
        self.check()?;
        let mut state = self.lock();
        state.dashboard_loads += 1;
        Ok(state.dashboard.clone())
    }

    async fn fetch_student_detail(
        &self,
        student_id: &StudentId,
    ) -> Result<StudentDetail, ApiError> {
        self.check()?;
        self.lock()
            .details
            .iter()
            .find(|detail| &detail.student_id == student_id)
            .cloned()
            .ok_or(ApiError::HttpStatus(StatusCode::NOT_FOUND))
    }

    async fn reset_data(&self) -> Result<(), ApiError> {
        self.check()?;
        let mut state = self.lock();
        state.resets += 1;
        state.dashboard = Dashboard::default();
        state.details.clear();
        Ok(())
    }

    async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, ApiError> {
        self.check()?;
        Ok(self.auth_for(AuthUser {
            role: request.role,
            name: request.email.clone(),
            email: request.email.clone(),
        }))
    }

    async fn signup(&self, request: &SignupRequest) -> Result<AuthResponse, ApiError> {
        self.check()?;
        Ok(self.auth_for(AuthUser {
            role: request.role,
            name: request.name.clone(),
            email: request.email.clone(),
        }))
    }

    async fn save_questions(&self, questions: &[Question]) -> Result<(), ApiError> {
        self.check()?;
        let mut state = self.lock();
        state.questions = questions.to_vec();
        state.saved.push(questions.to_vec());
        Ok(())
    }
}
