use async_trait::async_trait;
use chrono::{DateTime, Utc};
use gaps_core::model::AuthSession;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// The signed-in session plus when it was written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredSession {
    pub session: AuthSession,
    pub saved_at: DateTime<Utc>,
}

/// Local persistence for the single signed-in session.
#[async_trait]
pub trait AuthSessionRepository: Send + Sync {
    /// Fetch the stored session, if any.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backing store cannot be read.
    async fn load_session(&self) -> Result<Option<StoredSession>, StorageError>;

    /// Store `session`, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the session cannot be written.
    async fn save_session(
        &self,
        session: &AuthSession,
        saved_at: DateTime<Utc>,
    ) -> Result<(), StorageError>;

    /// Forget the stored session. Clearing an empty store is not an error.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backing store cannot be written.
    async fn clear_session(&self) -> Result<(), StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    session: Arc<Mutex<Option<StoredSession>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AuthSessionRepository for InMemoryRepository {
    async fn load_session(&self) -> Result<Option<StoredSession>, StorageError> {
        let guard = self
            .session
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.clone())
    }

    async fn save_session(
        &self,
        session: &AuthSession,
        saved_at: DateTime<Utc>,
    ) -> Result<(), StorageError> {
        let mut guard = self
            .session
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        *guard = Some(StoredSession {
            session: session.clone(),
            saved_at,
        });
        Ok(())
    }

    async fn clear_session(&self) -> Result<(), StorageError> {
        let mut guard = self
            .session
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        *guard = None;
        Ok(())
    }
}

/// Aggregates repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub sessions: Arc<dyn AuthSessionRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let sessions: Arc<dyn AuthSessionRepository> = Arc::new(InMemoryRepository::new());
        Self { sessions }
    }
}
