//! Mock login session
//!
//! Independent from the operative profile. Any non-empty id/code pair is
//! accepted; this is theatre, not authentication.

use log::{info, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::SESSION_KEY;
use crate::persistence::{KeyValue, StorageError, load_record, save_record};

/// Rank shown for every freshly logged-in session
pub const DEFAULT_SESSION_RANK: &str = "Operative";

/// Persisted as `{ id, name, rank }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub name: String,
    pub rank: String,
}

impl Session {
    /// Agent name derived from the last four characters of the id
    pub fn for_id(id: &str) -> Self {
        let tail: Vec<char> = id.chars().rev().take(4).collect();
        let suffix: String = tail.into_iter().rev().collect();
        Self {
            id: id.to_string(),
            name: format!("Agent_{suffix}"),
            rank: DEFAULT_SESSION_RANK.to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("agent id and access code are both required")]
    MissingCredentials,
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Start a session and persist it
pub fn login<K: KeyValue + ?Sized>(
    backend: &mut K,
    id: &str,
    code: &str,
) -> Result<Session, SessionError> {
    let id = id.trim();
    if id.is_empty() || code.trim().is_empty() {
        return Err(SessionError::MissingCredentials);
    }
    let session = Session::for_id(id);
    save_record(backend, SESSION_KEY, &session)?;
    info!("Session started for {}", session.name);
    Ok(session)
}

/// Current session, if any. An unreadable record counts as logged out.
pub fn current<K: KeyValue + ?Sized>(backend: &K) -> Option<Session> {
    match load_record(backend, SESSION_KEY) {
        Ok(session) => session,
        Err(e) => {
            warn!("Ignoring stored session: {e}");
            None
        }
    }
}

pub fn logout<K: KeyValue + ?Sized>(backend: &mut K) -> Result<(), StorageError> {
    backend.remove(SESSION_KEY)?;
    info!("Session ended");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStorage;

    #[test]
    fn test_login_logout() {
        let mut storage = MemoryStorage::new();
        assert!(current(&storage).is_none());

        let session = login(&mut storage, "20231234", "secret").unwrap();
        assert_eq!(session.name, "Agent_1234");
        assert_eq!(session.rank, "Operative");
        assert_eq!(current(&storage), Some(session));

        logout(&mut storage).unwrap();
        assert!(current(&storage).is_none());
    }

    #[test]
    fn test_login_requires_both_fields() {
        let mut storage = MemoryStorage::new();
        assert!(matches!(
            login(&mut storage, "", "code"),
            Err(SessionError::MissingCredentials)
        ));
        assert!(matches!(
            login(&mut storage, "123", "  "),
            Err(SessionError::MissingCredentials)
        ));
        assert!(storage.is_empty());
    }

    #[test]
    fn test_short_id() {
        assert_eq!(Session::for_id("42").name, "Agent_42");
    }

    #[test]
    fn test_corrupt_session_is_logged_out() {
        let mut storage = MemoryStorage::new();
        storage.set(SESSION_KEY, "[]").unwrap();
        assert!(current(&storage).is_none());
    }

    #[test]
    fn test_session_independent_of_profile() {
        use crate::persistence::ProfileStore;

        let mut storage = MemoryStorage::new();
        login(&mut storage, "20231234", "x").unwrap();
        assert!(storage.load().unwrap().is_none());
    }
}
