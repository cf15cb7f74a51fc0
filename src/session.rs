//! Local login session: one user record in the key-value store.
//!
//! There is no password verification and no token; the record only gates
//! which greeting the screens show. The favorites store works the same
//! whether or not a session exists.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::db::KvStore;

/// Storage key holding the session record.
const SESSION_KEY: &str = "session_user";

/// The stored user record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionUser {
    pub email: String,
    pub logged_in_at: DateTime<Utc>,
}

pub struct SessionStore {
    kv: KvStore,
}

impl SessionStore {
    pub fn new(kv: KvStore) -> Self {
        Self { kv }
    }

    /// Returns the logged-in user, or `None` when no readable record exists.
    pub async fn current(&self) -> Option<SessionUser> {
        let raw = match self.kv.get(SESSION_KEY).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!("Failed to read session record: {}", e);
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(user) => Some(user),
            Err(e) => {
                tracing::warn!("Unreadable session record, treating as logged out: {}", e);
                None
            }
        }
    }

    /// Stores a session record for `email`, replacing any previous one.
    pub async fn login(&self, email: &str) -> Result<SessionUser, SessionError> {
        let user = SessionUser {
            email: email.to_string(),
            logged_in_at: Utc::now(),
        };
        let encoded = serde_json::to_string(&user).map_err(SessionError::Encode)?;
        self.kv
            .set(SESSION_KEY, &encoded)
            .await
            .map_err(SessionError::Storage)?;
        Ok(user)
    }

    /// Clears the session record. Clearing an absent record is a no-op.
    pub async fn logout(&self) -> Result<(), SessionError> {
        self.kv.remove(SESSION_KEY).await.map_err(SessionError::Storage)
    }
}

#[derive(Debug)]
pub enum SessionError {
    /// The underlying key-value store failed.
    Storage(sqlx::Error),
    /// Failed to encode the session record.
    Encode(serde_json::Error),
}

impl std::fmt::Display for SessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionError::Storage(e) => write!(f, "Session storage error: {}", e),
            SessionError::Encode(e) => write!(f, "Failed to encode session: {}", e),
        }
    }
}

impl std::error::Error for SessionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SessionError::Storage(e) => Some(e),
            SessionError::Encode(e) => Some(e),
        }
    }
}
