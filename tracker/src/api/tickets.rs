//! Ticket API endpoints.
//!
//! All endpoints require a session:
//! - GET /api/tickets - List tickets (`?status=` and `?search=` filters)
//! - POST /api/tickets - Create a ticket
//! - GET /api/tickets/:id - Get one ticket
//! - PUT /api/tickets/:id - Update a ticket
//! - DELETE /api/tickets/:id - Delete a ticket
//! - GET /api/dashboard - Status counts and recent tickets

use crate::auth::middleware::SessionUser;
use crate::dashboard::Dashboard;
use crate::server::state::AppState;
use crate::session::TicketStore;
use crate::types::{Ticket, TicketAction, TicketError, TicketFilters, TicketId, TicketInput};
use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use std::time::Duration;
use tracker_web::{error::AppError, extractors::CorrelationId};

impl From<TicketError> for AppError {
    fn from(error: TicketError) -> Self {
        match error {
            TicketError::NotFound(id) => Self::not_found("Ticket", id),
            TicketError::Validation(errors) => Self::invalid_fields(errors),
        }
    }
}

/// Parse a path id; ids that are not numbers cannot name a ticket.
fn parse_id(raw: &str) -> Result<TicketId, AppError> {
    raw.parse().map_err(|_| AppError::not_found("Ticket", raw))
}

/// Send a command and wait for its outcome event.
///
/// The store hands this command's outcome to this caller alone, so requests
/// sharing a correlation id cannot receive each other's results.
async fn dispatch(
    tickets: &TicketStore,
    action: TicketAction,
    timeout: Duration,
) -> Result<TicketAction, AppError> {
    let correlation_id = action.correlation_id();

    let outcome = tickets
        .send_and_wait_for(action, TicketAction::is_event, timeout)
        .await
        .inspect_err(|error| tracing::warn!(%correlation_id, %error, "Ticket command failed"))?;

    tracing::debug!(%correlation_id, ?outcome, "Ticket command answered");
    Ok(outcome)
}

/// Map a failure outcome to an error; anything else is unexpected here.
fn refusal(outcome: TicketAction) -> AppError {
    match outcome {
        TicketAction::TicketNotFound { id, .. } => TicketError::NotFound(id).into(),
        TicketAction::ValidationFailed { errors, .. } => TicketError::Validation(errors).into(),
        other => {
            tracing::error!(?other, "Unexpected ticket outcome");
            AppError::internal("Unexpected response from ticket store")
        },
    }
}

/// List tickets in creation order.
///
/// # Example
///
/// ```bash
/// curl "http://localhost:8080/api/tickets?status=open&search=login" \
///   -H "Authorization: Bearer <token>"
/// ```
pub async fn list_tickets(
    session: SessionUser,
    Query(filters): Query<TicketFilters>,
) -> Result<Json<Vec<Ticket>>, AppError> {
    let tickets = session.tickets().state(|s| s.list(&filters)).await;

    tracing::debug!(
        session_id = %session.session_id(),
        count = tickets.len(),
        "Listed tickets"
    );

    Ok(Json(tickets))
}

/// Create a ticket.
///
/// A body that is not valid JSON counts as empty and fails validation.
///
/// # Example
///
/// ```bash
/// curl -X POST http://localhost:8080/api/tickets \
///   -H "Authorization: Bearer <token>" \
///   -H "Content-Type: application/json" \
///   -d '{"title": "Fix login", "status": "open", "priority": "high"}'
/// ```
pub async fn create_ticket(
    session: SessionUser,
    State(state): State<AppState>,
    correlation_id: CorrelationId,
    body: Bytes,
) -> Result<(StatusCode, Json<Ticket>), AppError> {
    let action = TicketAction::CreateTicket {
        correlation_id: correlation_id.0,
        input: TicketInput::from_json(&body),
    };

    match dispatch(session.tickets(), action, state.config.request_timeout()).await? {
        TicketAction::TicketCreated { ticket, .. } => Ok((StatusCode::CREATED, Json(ticket))),
        other => Err(refusal(other)),
    }
}

/// Get one ticket.
pub async fn get_ticket(
    session: SessionUser,
    Path(raw_id): Path<String>,
) -> Result<Json<Ticket>, AppError> {
    let id = parse_id(&raw_id)?;

    session
        .tickets()
        .state(|s| s.get(id).cloned())
        .await
        .map(Json)
        .ok_or_else(|| TicketError::NotFound(id).into())
}

/// Update a ticket.
///
/// `title` and `status` are required; `description` and `priority` change
/// only when supplied.
///
/// # Example
///
/// ```bash
/// curl -X PUT http://localhost:8080/api/tickets/1 \
///   -H "Authorization: Bearer <token>" \
///   -H "Content-Type: application/json" \
///   -d '{"title": "Fix login", "status": "closed"}'
/// ```
pub async fn update_ticket(
    session: SessionUser,
    State(state): State<AppState>,
    correlation_id: CorrelationId,
    Path(raw_id): Path<String>,
    body: Bytes,
) -> Result<Json<Ticket>, AppError> {
    let id = parse_id(&raw_id)?;
    let action = TicketAction::UpdateTicket {
        correlation_id: correlation_id.0,
        id,
        input: TicketInput::from_json(&body),
    };

    match dispatch(session.tickets(), action, state.config.request_timeout()).await? {
        TicketAction::TicketUpdated { ticket, .. } => Ok(Json(ticket)),
        other => Err(refusal(other)),
    }
}

/// Delete a ticket.
pub async fn delete_ticket(
    session: SessionUser,
    State(state): State<AppState>,
    correlation_id: CorrelationId,
    Path(raw_id): Path<String>,
) -> Result<StatusCode, AppError> {
    let id = parse_id(&raw_id)?;
    let action = TicketAction::DeleteTicket {
        correlation_id: correlation_id.0,
        id,
    };

    match dispatch(session.tickets(), action, state.config.request_timeout()).await? {
        TicketAction::TicketDeleted { .. } => Ok(StatusCode::NO_CONTENT),
        other => Err(refusal(other)),
    }
}

/// Status counts and the most recent tickets.
pub async fn dashboard(
    session: SessionUser,
    State(state): State<AppState>,
) -> Result<Json<Dashboard>, AppError> {
    let limit = state.config.tickets.recent_limit;
    let dashboard = session
        .tickets()
        .state(|s| Dashboard::from_tickets(s.tickets(), limit))
        .await;

    Ok(Json(dashboard))
}
