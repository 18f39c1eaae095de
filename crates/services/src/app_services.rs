use std::sync::Arc;

use storage::repository::Storage;

use crate::Clock;
use crate::api::{ApiClient, ApiConfig, QuizBackend};
use crate::auth_service::AuthService;
use crate::authoring::AuthoringService;
use crate::dashboard_service::DashboardService;
use crate::error::AppServicesError;
use crate::quiz_workflow::QuizWorkflow;

/// Assembles the app-facing services around one backend and one store.
#[derive(Clone)]
pub struct AppServices {
    quiz: Arc<QuizWorkflow>,
    dashboard: Arc<DashboardService>,
    auth: Arc<AuthService>,
    authoring: Arc<AuthoringService>,
}

impl AppServices {
    /// Services talking to the REST backend, with the session kept in `SQLite`.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization fails.
    pub async fn new_sqlite(
        api: ApiConfig,
        db_url: &str,
        clock: Clock,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        tracing::info!(api_url = %api.base_url, "services ready");
        let backend: Arc<dyn QuizBackend> = Arc::new(ApiClient::new(api));
        Ok(Self::from_parts(backend, &storage, clock))
    }

    /// Services over any backend with an in-memory session store.
    #[must_use]
    pub fn in_memory(backend: Arc<dyn QuizBackend>, clock: Clock) -> Self {
        Self::from_parts(backend, &Storage::in_memory(), clock)
    }

    fn from_parts(backend: Arc<dyn QuizBackend>, storage: &Storage, clock: Clock) -> Self {
        Self {
            quiz: Arc::new(QuizWorkflow::new(clock, Arc::clone(&backend))),
            dashboard: Arc::new(DashboardService::new(clock, Arc::clone(&backend))),
            auth: Arc::new(AuthService::new(
                clock,
                Arc::clone(&backend),
                Arc::clone(&storage.sessions),
            )),
            authoring: Arc::new(AuthoringService::new(backend)),
        }
    }

    #[must_use]
    pub fn quiz(&self) -> Arc<QuizWorkflow> {
        Arc::clone(&self.quiz)
    }

    #[must_use]
    pub fn dashboard(&self) -> Arc<DashboardService> {
        Arc::clone(&self.dashboard)
    }

    #[must_use]
    pub fn auth(&self) -> Arc<AuthService> {
        Arc::clone(&self.auth)
    }

    #[must_use]
    pub fn authoring(&self) -> Arc<AuthoringService> {
        Arc::clone(&self.authoring)
    }
}
