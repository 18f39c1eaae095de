use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};

use gaps_core::model::{
    Analysis, Dashboard, LoginRequest, Question, SignupRequest, StudentDetail, StudentId,
};
use gaps_core::quiz::QuizSubmission;

use super::{ApiConfig, AuthResponse, QuizBackend};
use crate::error::{AUTH_FAILED_MESSAGE, ApiError};

/// `reqwest` implementation of `QuizBackend`. No retries, no client-side timeout.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    config: ApiConfig,
}

impl ApiClient {
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(ApiConfig::from_env())
    }

    #[must_use]
    pub fn new(config: ApiConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    #[must_use]
    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    fn ensure_success(response: Response) -> Result<Response, ApiError> {
        if !response.status().is_success() {
            return Err(ApiError::HttpStatus(response.status()));
        }
        Ok(response)
    }

    async fn post_auth<B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<AuthResponse, ApiError> {
        let url = self.config.endpoint(&["auth", path])?;
        let response = self.client.post(url).json(body).send().await?;
        if !response.status().is_success() {
            let status = response.status();
            let detail = response
                .json::<ErrorBody>()
                .await
                .ok()
                .and_then(ErrorBody::detail_text)
                .unwrap_or_else(|| AUTH_FAILED_MESSAGE.to_string());
            tracing::warn!(%status, path, "auth request rejected");
            return Err(ApiError::Auth { detail });
        }
        Ok(response.json().await?)
    }
}

#[async_trait]
impl QuizBackend for ApiClient {
    async fn fetch_questions(&self) -> Result<Vec<Question>, ApiError> {
        let url = self.config.endpoint(&["questions"])?;
        let response = Self::ensure_success(self.client.get(url).send().await?)?;
        let body: QuestionsBody = response.json().await?;
        Ok(body.questions)
    }

    async fn submit_quiz(&self, submission: &QuizSubmission) -> Result<Analysis, ApiError> {
        let url = self.config.endpoint(&["submit-quiz"])?;
        let response =
            Self::ensure_success(self.client.post(url).json(submission).send().await?)?;
        let body: SubmitBody = response.json().await?;
        Ok(body.analysis)
    }

    async fn fetch_dashboard(&self) -> Result<Dashboard, ApiError> {
        let url = self.config.endpoint(&["teacher-dashboard"])?;
        let response = Self::ensure_success(self.client.get(url).send().await?)?;
        Ok(response.json().await?)
    }

    async fn fetch_student_detail(
        &self,
        student_id: &StudentId,
    ) -> Result<StudentDetail, ApiError> {
        let url = self
            .config
            .endpoint(&["student-detail", student_id.as_str()])?;
        let response = Self::ensure_success(self.client.get(url).send().await?)?;
        Ok(response.json().await?)
    }

    async fn reset_data(&self) -> Result<(), ApiError> {
        let url = self.config.endpoint(&["reset-data"])?;
        Self::ensure_success(self.client.delete(url).send().await?)?;
        Ok(())
    }

    async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, ApiError> {
        self.post_auth("login", request).await
    }

    async fn signup(&self, request: &SignupRequest) -> Result<AuthResponse, ApiError> {
        self.post_auth("signup", request).await
    }

    async fn save_questions(&self, questions: &[Question]) -> Result<(), ApiError> {
        let url = self.config.endpoint(&["save-questions"])?;
        let payload = SaveQuestionsBody { questions };
        Self::ensure_success(self.client.post(url).json(&payload).send().await?)?;
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct QuestionsBody {
    #[serde(default)]
    questions: Vec<Question>,
}

#[derive(Debug, Deserialize)]
struct SubmitBody {
    analysis: Analysis,
}

#[derive(Debug, Serialize)]
struct SaveQuestionsBody<'a> {
    questions: &'a [Question],
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    detail: Option<serde_json::Value>,
}

impl ErrorBody {
    /// Only a plain-string `detail` is shown; structured validation errors are not.
    fn detail_text(self) -> Option<String> {
        match self.detail? {
            serde_json::Value::String(text) if !text.trim().is_empty() => Some(text),
            _ => None,
        }
    }
}
