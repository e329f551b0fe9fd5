//! Server-side sessions.
//!
//! A session is created by login or signup and identified by an opaque
//! UUID handed to the client as a bearer token. Each session owns its own
//! ticket [`Store`], so tickets never leak between sessions and every
//! session's commands are applied one at a time.

mod memory;

pub use memory::MemorySessionStore;

use crate::reducer::{TicketEnvironment, TicketReducer};
use crate::types::{TicketAction, TicketState};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;
use std::str::FromStr;
use thiserror::Error;
use tracker_runtime::Store;
use uuid::Uuid;

/// Store holding one session's tickets
pub type TicketStore = Store<TicketState, TicketAction, TicketEnvironment, TicketReducer>;

/// Opaque session identifier, also used as the bearer token
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(Uuid);

impl SessionId {
    /// Creates a new random `SessionId`
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the inner UUID
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SessionId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// The person a session belongs to.
///
/// Credentials are never verified or stored.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Email given at login or signup
    pub email: String,
    /// Display name, known only after signup
    pub name: Option<String>,
}

/// An authenticated session and the tickets it owns
#[derive(Clone)]
pub struct Session {
    /// Session identifier
    pub session_id: SessionId,
    /// Authenticated user
    pub user: User,
    /// When the session was opened
    pub created_at: DateTime<Utc>,
    /// When the session stops being valid
    pub expires_at: DateTime<Utc>,
    /// This session's ticket store
    pub tickets: TicketStore,
}

impl Session {
    /// Whether the session is no longer valid at `now`
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("session_id", &self.session_id)
            .field("user", &self.user)
            .field("created_at", &self.created_at)
            .field("expires_at", &self.expires_at)
            .finish_non_exhaustive()
    }
}

/// Session lookup failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// No session with this id
    #[error("Session not found")]
    NotFound,

    /// The session existed but has expired
    #[error("Session expired")]
    Expired,

    /// A session with this id is already stored
    #[error("Session already exists")]
    AlreadyExists,

    /// The store itself failed
    #[error("Session store error: {0}")]
    Internal(String),
}

/// Storage for sessions.
///
/// Implementations treat expired sessions as absent.
pub trait SessionStore: Send + Sync {
    /// Store a new session.
    ///
    /// # Errors
    ///
    /// - [`SessionError::AlreadyExists`]: the id is taken
    /// - [`SessionError::Internal`]: storage failure
    fn create_session(
        &self,
        session: &Session,
    ) -> impl Future<Output = Result<(), SessionError>> + Send;

    /// Fetch a live session.
    ///
    /// # Errors
    ///
    /// - [`SessionError::NotFound`]: no such session
    /// - [`SessionError::Expired`]: the session expired (it is dropped)
    /// - [`SessionError::Internal`]: storage failure
    fn get_session(
        &self,
        session_id: SessionId,
    ) -> impl Future<Output = Result<Session, SessionError>> + Send;

    /// Remove a session, returning it.
    ///
    /// # Errors
    ///
    /// - [`SessionError::NotFound`]: no such session
    /// - [`SessionError::Internal`]: storage failure
    fn delete_session(
        &self,
        session_id: SessionId,
    ) -> impl Future<Output = Result<Session, SessionError>> + Send;

    /// Drop every expired session, returning how many were removed.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Internal`] on storage failure.
    fn purge_expired(&self) -> impl Future<Output = Result<usize, SessionError>> + Send;

    /// Number of stored sessions, expired or not.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Internal`] on storage failure.
    fn session_count(&self) -> impl Future<Output = Result<usize, SessionError>> + Send;
}
