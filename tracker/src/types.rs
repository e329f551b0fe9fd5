//! Domain types for the ticket tracker.
//!
//! A session owns an ordered list of tickets. Tickets are created, updated,
//! and deleted through [`TicketAction`] commands; every command answers with
//! exactly one outcome event carrying the same correlation id.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// Identifier of a ticket, unique within one session
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TicketId(u64);

impl TicketId {
    /// Wraps a raw id
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw id
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }

    /// The id following this one
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

impl fmt::Display for TicketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TicketId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}

/// Lifecycle status of a ticket
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    /// Not started
    Open,
    /// Being worked on
    InProgress,
    /// Done
    Closed,
}

impl TicketStatus {
    /// Every status, in display order
    pub const ALL: [Self; 3] = [Self::Open, Self::InProgress, Self::Closed];

    /// Wire spelling of the status
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::InProgress => "in_progress",
            Self::Closed => "closed",
        }
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string is not one of the three status spellings
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown ticket status: {0}")]
pub struct UnknownStatus(pub String);

impl FromStr for TicketStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

/// A stored ticket
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    /// Unique identifier within the session
    pub id: TicketId,
    /// Short summary, never blank
    pub title: String,
    /// Free text, empty when not supplied
    pub description: String,
    /// Current status
    pub status: TicketStatus,
    /// Free-form priority label
    pub priority: String,
    /// When the ticket was created
    pub created: DateTime<Utc>,
}

/// Raw ticket fields as submitted by a client.
///
/// Every field is optional so that "absent" and "empty" stay distinguishable.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketInput {
    /// Requested title
    #[serde(default)]
    pub title: Option<String>,
    /// Requested description
    #[serde(default)]
    pub description: Option<String>,
    /// Requested status, unparsed
    #[serde(default)]
    pub status: Option<String>,
    /// Requested priority
    #[serde(default)]
    pub priority: Option<String>,
}

impl TicketInput {
    /// Parse a JSON request body.
    ///
    /// A body that is not a JSON object of string fields yields an empty
    /// input, which then fails validation.
    #[must_use]
    pub fn from_json(body: &[u8]) -> Self {
        serde_json::from_slice(body).unwrap_or_default()
    }
}

/// Query filters for listing tickets
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketFilters {
    /// Keep only tickets whose status spells exactly this
    #[serde(default)]
    pub status: Option<String>,
    /// Keep only tickets whose title or description contains this, ignoring case
    #[serde(default)]
    pub search: Option<String>,
}

impl TicketFilters {
    /// Whether a ticket passes every filter that is set.
    ///
    /// Empty filter values count as unset.
    #[must_use]
    pub fn matches(&self, ticket: &Ticket) -> bool {
        let status_ok = match self.status.as_deref() {
            None | Some("") => true,
            Some(status) => ticket.status.as_str() == status,
        };

        let search_ok = match self.search.as_deref() {
            None | Some("") => true,
            Some(term) => {
                let term = term.to_lowercase();
                ticket.title.to_lowercase().contains(&term)
                    || ticket.description.to_lowercase().contains(&term)
            },
        };

        status_ok && search_ok
    }
}

/// Field name to message, ordered by field name
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, String>);

impl ValidationErrors {
    /// No errors
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Record a message for a field, replacing any earlier one
    pub fn insert(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.insert(field.into(), message.into());
    }

    /// Message recorded for a field
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    /// True when nothing was rejected
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of rejected fields
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Rejected field names, in order
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl IntoIterator for ValidationErrors {
    type Item = (String, String);
    type IntoIter = std::collections::btree_map::IntoIter<String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Ways a ticket command can be refused
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TicketError {
    /// No ticket with this id exists in the session
    #[error("Ticket with id {0} not found")]
    NotFound(TicketId),

    /// The submitted fields were rejected
    #[error("Validation failed for {} field(s)", .0.len())]
    Validation(ValidationErrors),
}

/// Ticket list owned by one session
#[derive(Clone, Debug, Default)]
pub struct TicketState {
    /// Tickets in creation order
    tickets: Vec<Ticket>,
    /// Highest id ever issued in this state
    last_issued: Option<TicketId>,
}

impl TicketState {
    /// Creates an empty ticket list
    #[must_use]
    pub const fn new() -> Self {
        Self {
            tickets: Vec::new(),
            last_issued: None,
        }
    }

    /// Number of stored tickets
    #[must_use]
    pub fn count(&self) -> usize {
        self.tickets.len()
    }

    /// Stored tickets in creation order
    #[must_use]
    pub fn tickets(&self) -> &[Ticket] {
        &self.tickets
    }

    /// Ticket with the given id
    #[must_use]
    pub fn get(&self, id: TicketId) -> Option<&Ticket> {
        self.tickets.iter().find(|t| t.id == id)
    }

    /// Checks if a ticket exists
    #[must_use]
    pub fn exists(&self, id: TicketId) -> bool {
        self.get(id).is_some()
    }

    /// Tickets passing the filters, in creation order
    #[must_use]
    pub fn list(&self, filters: &TicketFilters) -> Vec<Ticket> {
        self.tickets
            .iter()
            .filter(|t| filters.matches(t))
            .cloned()
            .collect()
    }

    /// Id the next created ticket receives.
    ///
    /// One past the largest id currently stored or ever issued, so ids of
    /// deleted tickets are not handed out again.
    #[must_use]
    pub fn next_id(&self) -> TicketId {
        let stored = self.tickets.iter().map(|t| t.id).max();
        stored
            .max(self.last_issued)
            .map_or(TicketId::new(1), TicketId::next)
    }

    pub(crate) fn push(&mut self, ticket: Ticket) {
        self.last_issued = self.last_issued.max(Some(ticket.id));
        self.tickets.push(ticket);
    }

    pub(crate) fn get_mut(&mut self, id: TicketId) -> Option<&mut Ticket> {
        self.tickets.iter_mut().find(|t| t.id == id)
    }

    pub(crate) fn remove(&mut self, id: TicketId) -> Option<Ticket> {
        let index = self.tickets.iter().position(|t| t.id == id)?;
        Some(self.tickets.remove(index))
    }
}

/// Commands and events for a session's tickets
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TicketAction {
    // ========== Commands ==========
    /// Command: Create a ticket
    CreateTicket {
        /// Request correlation id
        correlation_id: Uuid,
        /// Submitted fields
        input: TicketInput,
    },

    /// Command: Replace a ticket's fields
    UpdateTicket {
        /// Request correlation id
        correlation_id: Uuid,
        /// Ticket to update
        id: TicketId,
        /// Submitted fields
        input: TicketInput,
    },

    /// Command: Delete a ticket
    DeleteTicket {
        /// Request correlation id
        correlation_id: Uuid,
        /// Ticket to delete
        id: TicketId,
    },

    // ========== Events ==========
    /// Event: Ticket was created
    TicketCreated {
        /// Request correlation id
        correlation_id: Uuid,
        /// The stored ticket
        ticket: Ticket,
    },

    /// Event: Ticket was updated
    TicketUpdated {
        /// Request correlation id
        correlation_id: Uuid,
        /// The ticket after the update
        ticket: Ticket,
    },

    /// Event: Ticket was deleted
    TicketDeleted {
        /// Request correlation id
        correlation_id: Uuid,
        /// Removed ticket id
        id: TicketId,
    },

    /// Event: Command named a ticket that does not exist
    TicketNotFound {
        /// Request correlation id
        correlation_id: Uuid,
        /// Requested id
        id: TicketId,
    },

    /// Event: Submitted fields were rejected
    ValidationFailed {
        /// Request correlation id
        correlation_id: Uuid,
        /// Field name to message
        errors: ValidationErrors,
    },
}

impl TicketAction {
    /// Correlation id of the request this action belongs to
    #[must_use]
    pub const fn correlation_id(&self) -> Uuid {
        match self {
            Self::CreateTicket { correlation_id, .. }
            | Self::UpdateTicket { correlation_id, .. }
            | Self::DeleteTicket { correlation_id, .. }
            | Self::TicketCreated { correlation_id, .. }
            | Self::TicketUpdated { correlation_id, .. }
            | Self::TicketDeleted { correlation_id, .. }
            | Self::TicketNotFound { correlation_id, .. }
            | Self::ValidationFailed { correlation_id, .. } => *correlation_id,
        }
    }

    /// True for requests to change state
    #[must_use]
    pub const fn is_command(&self) -> bool {
        matches!(
            self,
            Self::CreateTicket { .. } | Self::UpdateTicket { .. } | Self::DeleteTicket { .. }
        )
    }

    /// True for outcomes of a command
    #[must_use]
    pub const fn is_event(&self) -> bool {
        !self.is_command()
    }
}
