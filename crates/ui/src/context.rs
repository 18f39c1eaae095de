use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use dioxus::prelude::*;
use gaps_core::model::{AuthSession, AuthUser, Role};
use gaps_core::quiz::QuizTiming;
use services::{AuthOutcome, AuthService, AuthoringService, DashboardService, QuizWorkflow};

/// Default period of the dashboard live refresh.
pub const DEFAULT_LIVE_REFRESH: Duration = Duration::from_secs(10);

/// What the composition root hands to the views.
pub trait UiApp: Send + Sync {
    fn quiz(&self) -> Arc<QuizWorkflow>;
    fn dashboard(&self) -> Arc<DashboardService>;
    fn auth(&self) -> Arc<AuthService>;
    fn authoring(&self) -> Arc<AuthoringService>;

    fn timing(&self) -> QuizTiming {
        QuizTiming::default()
    }

    fn live_refresh(&self) -> Duration {
        DEFAULT_LIVE_REFRESH
    }

    /// Where exported reports are written.
    fn export_dir(&self) -> PathBuf {
        PathBuf::from(".")
    }
}

#[derive(Clone)]
pub struct AppContext {
    quiz: Arc<QuizWorkflow>,
    dashboard: Arc<DashboardService>,
    auth: Arc<AuthService>,
    authoring: Arc<AuthoringService>,
    timing: QuizTiming,
    live_refresh: Duration,
    export_dir: PathBuf,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        Self {
            quiz: app.quiz(),
            dashboard: app.dashboard(),
            auth: app.auth(),
            authoring: app.authoring(),
            timing: app.timing(),
            live_refresh: app.live_refresh(),
            export_dir: app.export_dir(),
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

    #[must_use]
    pub fn timing(&self) -> QuizTiming {
        self.timing
    }

    #[must_use]
    pub fn live_refresh(&self) -> Duration {
        self.live_refresh
    }

    #[must_use]
    pub fn export_dir(&self) -> PathBuf {
        self.export_dir.clone()
    }
}

// Provided by the composition root (`crates/app`).

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}

// ─── SIGNED-IN USER ───

/// Who is using the app right now. `user` is absent when the backend
/// accepted the credentials without issuing a token.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignedIn {
    pub role: Role,
    pub user: Option<AuthUser>,
}

impl SignedIn {
    #[must_use]
    pub fn from_outcome(outcome: &AuthOutcome) -> Self {
        Self {
            role: outcome.role,
            user: outcome.session.as_ref().map(|session| session.user.clone()),
        }
    }

    #[must_use]
    pub fn from_session(session: &AuthSession) -> Self {
        Self {
            role: session.user.role,
            user: Some(session.user.clone()),
        }
    }

    #[must_use]
    pub fn display_name(&self) -> &str {
        self.user.as_ref().map_or(self.role.as_str(), |user| user.name.as_str())
    }
}

/// Shared signal holding the signed-in user; provided at the app root.
pub type SignedInSignal = Signal<Option<SignedIn>>;

#[must_use]
pub fn use_signed_in() -> SignedInSignal {
    use_context::<SignedInSignal>()
}
