//! Authentication extractors.
//!
//! - [`BearerToken`]: the raw token from `Authorization: Bearer <token>`
//! - [`SessionUser`]: the live session the token names
//!
//! ```rust,ignore
//! async fn list_tickets(session: SessionUser) -> Result<Json<Vec<Ticket>>, AppError> {
//!     // session.session is guaranteed live
//! }
//! ```

use crate::server::state::AppState;
use crate::session::{Session, SessionError, SessionId, SessionStore, TicketStore};
use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use tracker_web::{error::AppError, extractors::ClientIp};

/// Bearer token extracted from `Authorization: Bearer <token>` header.
#[derive(Debug, Clone)]
pub struct BearerToken(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::unauthorized("Missing authorization header"))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| {
                AppError::unauthorized("Invalid authorization format. Expected 'Bearer <token>'")
            })?
            .trim();

        if token.is_empty() {
            return Err(AppError::unauthorized("Empty bearer token"));
        }

        Ok(Self(token.to_string()))
    }
}

/// Authenticated session.
///
/// Use this as a handler parameter to require authentication. Rejects with
/// 401 when the token is missing, malformed, unknown, or expired.
#[derive(Debug, Clone)]
pub struct SessionUser {
    /// The live session
    pub session: Session,
}

impl SessionUser {
    /// Session identifier
    #[must_use]
    pub const fn session_id(&self) -> SessionId {
        self.session.session_id
    }

    /// The session's ticket store
    #[must_use]
    pub const fn tickets(&self) -> &TicketStore {
        &self.session.tickets
    }
}

#[async_trait]
impl FromRequestParts<AppState> for SessionUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let client_ip = ClientIp::from_request_parts(parts, state)
            .await
            .map_or_else(|never| match never {}, |ip| ip.0);

        let bearer = BearerToken::from_request_parts(parts, state)
            .await
            .inspect_err(|_| tracing::warn!(%client_ip, "Request without usable bearer token"))?;

        let session_id: SessionId = bearer.0.parse().map_err(|_| {
            tracing::warn!(%client_ip, "Malformed session token");
            AppError::unauthorized("Invalid session token format")
        })?;

        match state.sessions.get_session(session_id).await {
            Ok(session) => Ok(Self { session }),
            Err(SessionError::NotFound) => {
                tracing::warn!(%session_id, %client_ip, "Unknown session");
                Err(AppError::unauthorized("Invalid session"))
            },
            Err(SessionError::Expired) => {
                tracing::warn!(%session_id, %client_ip, "Expired session");
                Err(AppError::unauthorized("Session expired"))
            },
            Err(error) => Err(AppError::internal("Session lookup failed")
                .with_source(anyhow::Error::new(error))),
        }
    }
}
