use chrono::{DateTime, Utc};
use gaps_core::model::{AuthSession, AuthUser, Role};
use sqlx::Row;

use crate::repository::{StorageError, StoredSession};

fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

pub(crate) fn parse_role(s: &str) -> Result<Role, StorageError> {
    Role::parse(s).ok_or_else(|| StorageError::Serialization(format!("invalid role: {s}")))
}

pub(crate) fn map_session_row(
    row: &sqlx::sqlite::SqliteRow,
) -> Result<StoredSession, StorageError> {
    let role: String = row.try_get("role").map_err(ser)?;
    let saved_at: DateTime<Utc> = row.try_get("saved_at").map_err(ser)?;
    Ok(StoredSession {
        session: AuthSession {
            token: row.try_get("token").map_err(ser)?,
            user: AuthUser {
                role: parse_role(&role)?,
                name: row.try_get("name").map_err(ser)?,
                email: row.try_get("email").map_err(ser)?,
            },
        },
        saved_at,
    })
}
