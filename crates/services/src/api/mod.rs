//! Backend seam: the `QuizBackend` trait, its REST client, and an in-memory double.

mod client;
mod config;
mod memory;

pub use client::ApiClient;
pub use config::{API_URL_ENV, ApiConfig, DEFAULT_API_URL};
pub use memory::InMemoryBackend;
pub use reqwest::StatusCode;

use async_trait::async_trait;
use gaps_core::model::{
    Analysis, AuthUser, Dashboard, LoginRequest, Question, SignupRequest, StudentDetail, StudentId,
};
use gaps_core::quiz::QuizSubmission;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Body of a successful auth call. `success == false` is a rejection.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AuthResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub user: Option<AuthUser>,
}

/// Everything the client needs from the analysis backend.
#[async_trait]
pub trait QuizBackend: Send + Sync {
    /// # Errors
    ///
    /// Returns `ApiError` on transport failure or a non-2xx status.
    async fn fetch_questions(&self) -> Result<Vec<Question>, ApiError>;

    /// # Errors
    ///
    /// Returns `ApiError` on transport failure or a non-2xx status.
    async fn submit_quiz(&self, submission: &QuizSubmission) -> Result<Analysis, ApiError>;

    /// # Errors
    ///
    /// Returns `ApiError` on transport failure or a non-2xx status.
    async fn fetch_dashboard(&self) -> Result<Dashboard, ApiError>;

    /// # Errors
    ///
    /// Returns `ApiError` on transport failure or a non-2xx status.
    async fn fetch_student_detail(&self, student_id: &StudentId)
    -> Result<StudentDetail, ApiError>;

    /// Delete all stored results.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport failure or a non-2xx status.
    async fn reset_data(&self) -> Result<(), ApiError>;

    /// # Errors
    ///
    /// Returns `ApiError::Auth` carrying the server `detail` on a non-2xx status.
    async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, ApiError>;

    /// # Errors
    ///
    /// Returns `ApiError::Auth` carrying the server `detail` on a non-2xx status.
    async fn signup(&self, request: &SignupRequest) -> Result<AuthResponse, ApiError>;

    /// Replace the question bank.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport failure or a non-2xx status.
    async fn save_questions(&self, questions: &[Question]) -> Result<(), ApiError>;
}
