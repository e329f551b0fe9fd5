//! Application state for the HTTP server.

use crate::config::Config;
use crate::reducer::{TicketEnvironment, TicketReducer};
use crate::session::{
    MemorySessionStore, Session, SessionError, SessionId, SessionStore, TicketStore, User,
};
use crate::types::TicketState;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tracker_core::environment::Clock;

/// Application state shared across all HTTP handlers.
///
/// Cloned (cheaply via Arc) for each request.
#[derive(Clone)]
pub struct AppState {
    /// Loaded configuration
    pub config: Arc<Config>,
    /// All live sessions
    pub sessions: MemorySessionStore,
    /// Time source for sessions and tickets
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: Config, clock: Arc<dyn Clock>) -> Self {
        Self {
            config: Arc::new(config),
            sessions: MemorySessionStore::new(Arc::clone(&clock)),
            clock,
        }
    }

    /// Open a session for `user` with an empty ticket list.
    ///
    /// # Errors
    ///
    /// Returns the session store's error if the session cannot be stored.
    pub async fn open_session(&self, user: User) -> Result<Session, SessionError> {
        let now = self.clock.now();
        let environment = TicketEnvironment::new(Arc::clone(&self.clock))
            .with_default_priority(self.config.tickets.default_priority.clone());

        let session = Session {
            session_id: SessionId::new(),
            user,
            created_at: now,
            expires_at: now
                .checked_add_signed(self.config.session_ttl())
                .unwrap_or(DateTime::<Utc>::MAX_UTC),
            tickets: TicketStore::new(TicketState::new(), TicketReducer::new(), environment),
        };

        self.sessions.create_session(&session).await?;

        metrics::counter!("tracker.sessions.opened").increment(1);
        tracing::info!(
            session_id = %session.session_id,
            email = %session.user.email,
            expires_at = %session.expires_at,
            "Session opened"
        );

        Ok(session)
    }

    /// End a session and discard its tickets.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NotFound`] if the session does not exist.
    pub async fn close_session(&self, session_id: SessionId) -> Result<(), SessionError> {
        let session = self.sessions.delete_session(session_id).await?;
        metrics::counter!("tracker.sessions.closed").increment(1);
        tracing::info!(%session_id, "Session closed");

        stop_ticket_store(&session, Duration::from_secs(1)).await;
        Ok(())
    }

    /// Drop expired sessions, returning how many were removed.
    ///
    /// # Errors
    ///
    /// Returns the session store's error on storage failure.
    pub async fn purge_expired_sessions(&self) -> Result<usize, SessionError> {
        let purged = self.sessions.purge_expired().await?;
        if purged > 0 {
            metrics::counter!("tracker.sessions.expired")
                .increment(u64::try_from(purged).unwrap_or(u64::MAX));
            tracing::info!(purged, "Expired sessions purged");
        }
        Ok(purged)
    }

    /// End every session, giving each ticket store up to `timeout` to finish.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Internal`] if the session map is unusable.
    pub async fn shutdown(&self, timeout: Duration) -> Result<(), SessionError> {
        let sessions = self.sessions.drain()?;
        tracing::info!(sessions = sessions.len(), "Closing all sessions");

        for session in &sessions {
            stop_ticket_store(session, timeout).await;
        }
        Ok(())
    }
}

async fn stop_ticket_store(session: &Session, timeout: Duration) {
    if let Err(error) = session.tickets.shutdown(timeout).await {
        tracing::warn!(session_id = %session.session_id, %error, "Ticket store did not drain");
    }
}
