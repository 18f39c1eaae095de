//! Shared error types for the services crate.

use thiserror::Error;

use gaps_core::model::{CredentialsError, QuestionError, QuestionId};
use gaps_core::quiz::QuizError;
use gaps_core::report::ReportError;
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

pub const AUTH_FAILED_MESSAGE: &str = "Authentication failed";

/// Errors emitted by the REST client.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ApiError {
    #[error("request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("{detail}")]
    Auth { detail: String },
    #[error("invalid api url: {0}")]
    InvalidUrl(String),
}

/// Errors emitted by `QuizWorkflow`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum WorkflowError {
    #[error(transparent)]
    Quiz(#[from] QuizError),
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Errors emitted by `AuthService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AuthError {
    #[error(transparent)]
    Credentials(#[from] CredentialsError),
    #[error("{0}")]
    Rejected(String),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl AuthError {
    /// Text for the inline form error. Server `detail` is shown verbatim.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Credentials(err) => format!("Please check your details: {err}."),
            Self::Rejected(message) | Self::Api(ApiError::Auth { detail: message }) => {
                message.clone()
            }
            Self::Api(_) => "An error occurred. Please try again.".to_string(),
            Self::Storage(_) => "Signed in, but the session could not be saved.".to_string(),
        }
    }
}

/// Errors emitted by `AuthoringService` and `QuestionSet`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AuthoringError {
    #[error(transparent)]
    Question(#[from] QuestionError),
    #[error("Please add at least one question before saving")]
    EmptyQuestionList,
    #[error("question {0} not found")]
    NotFound(QuestionId),
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Errors emitted by `DashboardService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DashboardError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Report(#[from] ReportError),
    #[error("failed to write report: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}
