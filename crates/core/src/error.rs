use thiserror::Error;

use crate::model::{ConfidenceError, CredentialsError, IdError, QuestionError};
use crate::quiz::QuizError;
use crate::report::ReportError;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Id(#[from] IdError),
    #[error(transparent)]
    Question(#[from] QuestionError),
    #[error(transparent)]
    Confidence(#[from] ConfidenceError),
    #[error(transparent)]
    Credentials(#[from] CredentialsError),
    #[error(transparent)]
    Quiz(#[from] QuizError),
    #[error(transparent)]
    Report(#[from] ReportError),
}
