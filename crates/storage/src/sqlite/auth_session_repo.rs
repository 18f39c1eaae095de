use async_trait::async_trait;
use chrono::{DateTime, Utc};
use gaps_core::model::AuthSession;

use crate::repository::{AuthSessionRepository, StorageError, StoredSession};

use super::SqliteRepository;
use super::mapping::map_session_row;

#[async_trait]
impl AuthSessionRepository for SqliteRepository {
    async fn load_session(&self) -> Result<Option<StoredSession>, StorageError> {
        let row = sqlx::query(
            r"
            SELECT token, role, name, email, saved_at
            FROM auth_session
            WHERE id = 1
            ",
        )
        .fetch_optional(&self.pool)
        .await
        .map_err(|err| StorageError::Connection(err.to_string()))?;

        row.as_ref().map(map_session_row).transpose()
    }

    async fn save_session(
        &self,
        session: &AuthSession,
        saved_at: DateTime<Utc>,
    ) -> Result<(), StorageError> {
        sqlx::query(
            r"
            INSERT INTO auth_session (id, token, role, name, email, saved_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ON CONFLICT(id) DO UPDATE SET
                token = excluded.token,
                role = excluded.role,
                name = excluded.name,
                email = excluded.email,
                saved_at = excluded.saved_at
            ",
        )
        .bind(1_i64)
        .bind(&session.token)
        .bind(session.user.role.as_str())
        .bind(&session.user.name)
        .bind(&session.user.email)
        .bind(saved_at)
        .execute(&self.pool)
        .await
        .map_err(|err| StorageError::Connection(err.to_string()))?;

        Ok(())
    }

    async fn clear_session(&self) -> Result<(), StorageError> {
        sqlx::query("DELETE FROM auth_session WHERE id = 1")
            .execute(&self.pool)
            .await
            .map_err(|err| StorageError::Connection(err.to_string()))?;
        Ok(())
    }
}
