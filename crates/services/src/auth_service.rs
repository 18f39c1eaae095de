use std::sync::Arc;

use gaps_core::model::{AuthSession, LoginForm, Role, SignupForm};
use storage::repository::AuthSessionRepository;

use crate::Clock;
use crate::api::{AuthResponse, QuizBackend};
use crate::error::{AUTH_FAILED_MESSAGE, AuthError};

/// Result of a successful login or signup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthOutcome {
    /// Role the user signed in as; decides the landing screen.
    pub role: Role,
    pub message: String,
    /// Present when the backend issued a token; it has been persisted.
    pub session: Option<AuthSession>,
}

/// Login, signup and the locally persisted session.
#[derive(Clone)]
pub struct AuthService {
    clock: Clock,
    backend: Arc<dyn QuizBackend>,
    sessions: Arc<dyn AuthSessionRepository>,
}

impl AuthService {
    #[must_use]
    pub fn new(
        clock: Clock,
        backend: Arc<dyn QuizBackend>,
        sessions: Arc<dyn AuthSessionRepository>,
    ) -> Self {
        Self {
            clock,
            backend,
            sessions,
        }
    }

    /// The session saved by a previous launch.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Storage` if the store cannot be read.
    pub async fn restore(&self) -> Result<Option<AuthSession>, AuthError> {
        let stored = self.sessions.load_session().await?;
        Ok(stored.map(|stored| stored.session))
    }

    /// Validate locally, then `POST /auth/login`.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Credentials` before any network call for a bad
    /// form, `Rejected`/`Api` for server refusals, or `Storage` if the
    /// session cannot be saved.
    pub async fn login(&self, form: &LoginForm, role: Role) -> Result<AuthOutcome, AuthError> {
        let request = form.validate(role)?;
        let response = self.backend.login(&request).await.map_err(|err| {
            tracing::warn!(error = %err, role = role.as_str(), "login failed");
            err
        })?;
        self.accept(role, response).await
    }

    /// Validate locally, then `POST /auth/signup`.
    ///
    /// # Errors
    ///
    /// Same as `login`.
    pub async fn signup(&self, form: &SignupForm, role: Role) -> Result<AuthOutcome, AuthError> {
        let request = form.validate(role)?;
        let response = self.backend.signup(&request).await.map_err(|err| {
            tracing::warn!(error = %err, role = role.as_str(), "signup failed");
            err
        })?;
        self.accept(role, response).await
    }

    /// # Errors
    ///
    /// Returns `AuthError::Storage` if the store cannot be cleared.
    pub async fn logout(&self) -> Result<(), AuthError> {
        self.sessions.clear_session().await?;
        tracing::info!("signed out");
        Ok(())
    }

    async fn accept(&self, role: Role, response: AuthResponse) -> Result<AuthOutcome, AuthError> {
        if !response.success {
            let message = if response.message.trim().is_empty() {
                AUTH_FAILED_MESSAGE.to_string()
            } else {
                response.message
            };
            return Err(AuthError::Rejected(message));
        }

        let session = match (response.token, response.user) {
            (Some(token), Some(user)) => {
                let session = AuthSession { token, user };
                self.sessions
                    .save_session(&session, self.clock.now())
                    .await?;
                Some(session)
            }
            _ => None,
        };
        tracing::info!(
            role = role.as_str(),
            persisted = session.is_some(),
            "signed in"
        );
        Ok(AuthOutcome {
            role,
            message: response.message,
            session,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::InMemoryBackend;
    use crate::error::ApiError;
    use gaps_core::model::{AuthUser, CredentialsError};
    use gaps_core::time::fixed_clock;
    use reqwest::StatusCode;
    use storage::repository::InMemoryRepository;

    fn service(backend: InMemoryBackend) -> AuthService {
        AuthService::new(
            fixed_clock(),
            Arc::new(backend),
            Arc::new(InMemoryRepository::new()),
        )
    }

    fn login_form() -> LoginForm {
        LoginForm {
            email: "ada@example.com".into(),
            password: "secret".into(),
        }
    }

    #[tokio::test]
    async fn login_persists_the_session() {
        let service = service(InMemoryBackend::new());
        let outcome = service.login(&login_form(), Role::Teacher).await.unwrap();
        assert_eq!(outcome.role, Role::Teacher);
        let session = outcome.session.unwrap();
        assert_eq!(session.user.email, "ada@example.com");

        let restored = service.restore().await.unwrap().unwrap();
        assert_eq!(restored, session);

        service.logout().await.unwrap();
        assert!(service.restore().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn invalid_form_is_caught_locally() {
        let backend = InMemoryBackend::new();
        backend.set_failing(Some(StatusCode::INTERNAL_SERVER_ERROR));
        let service = service(backend);
        let form = LoginForm {
            email: "not-an-email".into(),
            password: "secret".into(),
        };
        let err = service.login(&form, Role::Student).await.unwrap_err();
        assert!(matches!(
            err,
            AuthError::Credentials(CredentialsError::InvalidEmail)
        ));
    }

    #[tokio::test]
    async fn unsuccessful_response_is_rejected() {
        let backend = InMemoryBackend::new().with_auth_response(AuthResponse {
            success: false,
            ..AuthResponse::default()
        });
        let err = service(backend)
            .login(&login_form(), Role::Student)
            .await
            .unwrap_err();
        assert_eq!(err.user_message(), AUTH_FAILED_MESSAGE);
    }

    #[tokio::test]
    async fn success_without_token_is_not_persisted() {
        let backend = InMemoryBackend::new().with_auth_response(AuthResponse {
            success: true,
            message: "Account created".into(),
            token: None,
            user: Some(AuthUser {
                role: Role::Student,
                name: "Ada".into(),
                email: "ada@example.com".into(),
            }),
        });
        let service = service(backend);
        let form = SignupForm {
            name: "Ada".into(),
            email: "ada@example.com".into(),
            password: "secret".into(),
            subject: String::new(),
        };
        let outcome = service.signup(&form, Role::Student).await.unwrap();
        assert!(outcome.session.is_none());
        assert!(service.restore().await.unwrap().is_none());
    }

    #[test]
    fn server_detail_is_shown_verbatim() {
        let err = AuthError::Api(ApiError::Auth {
            detail: "User is registered as teacher".into(),
        });
        assert_eq!(err.user_message(), "User is registered as teacher");
    }
}
