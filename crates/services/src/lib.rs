#![forbid(unsafe_code)]

pub mod api;
pub mod app_services;
pub mod auth_service;
pub mod authoring;
pub mod dashboard_service;
pub mod error;
pub mod quiz_workflow;

pub use gaps_core::Clock;

pub use api::{ApiClient, ApiConfig, AuthResponse, InMemoryBackend, QuizBackend};
pub use app_services::AppServices;
pub use auth_service::{AuthOutcome, AuthService};
pub use authoring::{AUTHOR_OPTION_SLOTS, AuthoringService, QuestionSet};
pub use dashboard_service::{DashboardService, ExportedReport};
pub use error::{
    AppServicesError, ApiError, AuthError, AuthoringError, DashboardError, WorkflowError,
};
pub use quiz_workflow::QuizWorkflow;
