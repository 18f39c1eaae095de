mod analysis;
mod attempt;
mod auth;
mod ids;
mod question;
mod risk;

pub use analysis::{
    Analysis, ConceptGap, ConceptStats, Dashboard, DashboardSummary, StudentDetail,
    StudentOverview, percent_label,
};
pub use attempt::{Attempt, Confidence, ConfidenceError};
pub use auth::{
    AuthSession, AuthTab, AuthUser, CredentialsError, LoginForm, LoginRequest, Role, SignupForm,
    SignupRequest, is_valid_email, password_strength,
};
pub use ids::{IdError, QuestionId, QuizId, StudentId};
pub use question::{MIN_OPTIONS, Question, QuestionDraft, QuestionError};
pub use risk::RiskLevel;
