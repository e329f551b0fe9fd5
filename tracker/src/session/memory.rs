//! In-memory session store.

use super::{Session, SessionError, SessionId, SessionStore};
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};
use tracker_core::environment::Clock;

type SessionMap = HashMap<SessionId, Session>;

/// Session store backed by a process-local map.
///
/// Sessions vanish when the process exits.
#[derive(Clone)]
pub struct MemorySessionStore {
    sessions: Arc<Mutex<SessionMap>>,
    clock: Arc<dyn Clock>,
}

impl MemorySessionStore {
    /// Create an empty store that judges expiry with `clock`
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            sessions: Arc::new(Mutex::new(HashMap::new())),
            clock,
        }
    }

    /// Remove every session, returning them
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Internal`] if the lock is poisoned.
    pub fn drain(&self) -> Result<Vec<Session>, SessionError> {
        Ok(lock(&self.sessions)?.drain().map(|(_, session)| session).collect())
    }
}

fn lock(sessions: &Mutex<SessionMap>) -> Result<MutexGuard<'_, SessionMap>, SessionError> {
    sessions
        .lock()
        .map_err(|_| SessionError::Internal("Mutex lock failed".to_string()))
}

impl SessionStore for MemorySessionStore {
    fn create_session(
        &self,
        session: &Session,
    ) -> impl Future<Output = Result<(), SessionError>> + Send {
        let sessions = Arc::clone(&self.sessions);
        let session = session.clone();

        async move {
            let mut guard = lock(&sessions)?;

            if guard.contains_key(&session.session_id) {
                return Err(SessionError::AlreadyExists);
            }

            guard.insert(session.session_id, session);
            Ok(())
        }
    }

    fn get_session(
        &self,
        session_id: SessionId,
    ) -> impl Future<Output = Result<Session, SessionError>> + Send {
        let sessions = Arc::clone(&self.sessions);
        let now = self.clock.now();

        async move {
            let mut guard = lock(&sessions)?;

            let session = guard.get(&session_id).ok_or(SessionError::NotFound)?;

            if session.is_expired(now) {
                guard.remove(&session_id);
                return Err(SessionError::Expired);
            }

            Ok(session.clone())
        }
    }

    fn delete_session(
        &self,
        session_id: SessionId,
    ) -> impl Future<Output = Result<Session, SessionError>> + Send {
        let sessions = Arc::clone(&self.sessions);

        async move {
            lock(&sessions)?
                .remove(&session_id)
                .ok_or(SessionError::NotFound)
        }
    }

    fn purge_expired(&self) -> impl Future<Output = Result<usize, SessionError>> + Send {
        let sessions = Arc::clone(&self.sessions);
        let now = self.clock.now();

        async move {
            let mut guard = lock(&sessions)?;
            let before = guard.len();
            guard.retain(|_, session| !session.is_expired(now));
            Ok(before - guard.len())
        }
    }

    fn session_count(&self) -> impl Future<Output = Result<usize, SessionError>> + Send {
        let sessions = Arc::clone(&self.sessions);

        async move { Ok(lock(&sessions)?.len()) }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::reducer::{TicketEnvironment, TicketReducer};
    use crate::session::{TicketStore, User};
    use crate::types::TicketState;
    use chrono::Duration;
    use tracker_testing::{mocks::epoch, test_clock};

    fn store() -> MemorySessionStore {
        MemorySessionStore::new(Arc::new(test_clock()))
    }

    fn session(ttl: Duration) -> Session {
        let clock = Arc::new(test_clock());
        Session {
            session_id: SessionId::new(),
            user: User {
                email: "ada@example.com".to_string(),
                name: None,
            },
            created_at: epoch(),
            expires_at: epoch() + ttl,
            tickets: TicketStore::new(
                TicketState::new(),
                TicketReducer::new(),
                TicketEnvironment::new(clock),
            ),
        }
    }

    #[tokio::test]
    async fn create_then_get() {
        let store = store();
        let session = session(Duration::hours(1));

        store.create_session(&session).await.unwrap();
        let found = store.get_session(session.session_id).await.unwrap();

        assert_eq!(found.user.email, "ada@example.com");
        assert_eq!(store.session_count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn duplicate_id_is_rejected() {
        let store = store();
        let session = session(Duration::hours(1));

        store.create_session(&session).await.unwrap();
        assert_eq!(
            store.create_session(&session).await,
            Err(SessionError::AlreadyExists)
        );
    }

    #[tokio::test]
    async fn unknown_session_is_not_found() {
        assert_eq!(
            store().get_session(SessionId::new()).await.unwrap_err(),
            SessionError::NotFound
        );
    }

    #[tokio::test]
    async fn expired_session_is_dropped_on_lookup() {
        let store = store();
        let session = session(Duration::zero());
        store.create_session(&session).await.unwrap();

        assert_eq!(
            store.get_session(session.session_id).await.unwrap_err(),
            SessionError::Expired
        );
        assert_eq!(store.session_count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn purge_removes_only_expired() {
        let store = store();
        store.create_session(&session(Duration::zero())).await.unwrap();
        store.create_session(&session(Duration::zero())).await.unwrap();
        store.create_session(&session(Duration::hours(1))).await.unwrap();

        assert_eq!(store.purge_expired().await.unwrap(), 2);
        assert_eq!(store.session_count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn delete_returns_session_once() {
        let store = store();
        let session = session(Duration::hours(1));
        store.create_session(&session).await.unwrap();

        let removed = store.delete_session(session.session_id).await.unwrap();
        assert_eq!(removed.session_id, session.session_id);
        assert_eq!(
            store.delete_session(session.session_id).await.unwrap_err(),
            SessionError::NotFound
        );
    }

    #[tokio::test]
    async fn drain_empties_the_store() {
        let store = store();
        store.create_session(&session(Duration::hours(1))).await.unwrap();

        assert_eq!(store.drain().unwrap().len(), 1);
        assert_eq!(store.session_count().await.unwrap(), 0);
    }
}
