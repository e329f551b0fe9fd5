//! Dashboard summary derived from a session's tickets.

use crate::types::{Ticket, TicketStatus};
use serde::Serialize;
use std::cmp::Reverse;

/// Number of tickets shown in the recent list by default
pub const RECENT_LIMIT: usize = 5;

/// Counts per status plus the most recently created tickets
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Dashboard {
    /// All tickets
    pub total: usize,
    /// Tickets with status `open`
    pub open: usize,
    /// Tickets with status `in_progress`
    pub in_progress: usize,
    /// Tickets with status `closed`
    pub closed: usize,
    /// Newest tickets first
    pub recent: Vec<Ticket>,
}

impl Dashboard {
    /// Summarize tickets given in creation order.
    ///
    /// `recent` holds up to `recent_limit` tickets by creation time,
    /// newest first; tickets created at the same instant list the later
    /// insertion first.
    #[must_use]
    pub fn from_tickets(tickets: &[Ticket], recent_limit: usize) -> Self {
        let count = |status: TicketStatus| tickets.iter().filter(|t| t.status == status).count();

        let mut recent: Vec<&Ticket> = tickets.iter().rev().collect();
        recent.sort_by_key(|t| Reverse(t.created));

        Self {
            total: tickets.len(),
            open: count(TicketStatus::Open),
            in_progress: count(TicketStatus::InProgress),
            closed: count(TicketStatus::Closed),
            recent: recent.into_iter().take(recent_limit).cloned().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TicketId;
    use chrono::{DateTime, Duration, Utc};

    fn ticket(id: u64, status: TicketStatus, created: DateTime<Utc>) -> Ticket {
        Ticket {
            id: TicketId::new(id),
            title: format!("ticket {id}"),
            description: String::new(),
            status,
            priority: "medium".to_string(),
            created,
        }
    }

    fn ids(tickets: &[Ticket]) -> Vec<u64> {
        tickets.iter().map(|t| t.id.get()).collect()
    }

    #[test]
    fn counts_by_status() {
        let now = DateTime::<Utc>::UNIX_EPOCH;
        let tickets = [
            ticket(1, TicketStatus::Open, now),
            ticket(2, TicketStatus::Open, now),
            ticket(3, TicketStatus::InProgress, now),
            ticket(4, TicketStatus::Closed, now),
        ];

        let dashboard = Dashboard::from_tickets(&tickets, RECENT_LIMIT);
        assert_eq!(dashboard.total, 4);
        assert_eq!(dashboard.open, 2);
        assert_eq!(dashboard.in_progress, 1);
        assert_eq!(dashboard.closed, 1);
    }

    #[test]
    fn recent_is_newest_first_and_limited() {
        let start = DateTime::<Utc>::UNIX_EPOCH;
        let tickets: Vec<_> = (1_i64..=6)
            .map(|n| ticket(n.unsigned_abs(), TicketStatus::Open, start + Duration::seconds(n)))
            .collect();

        let dashboard = Dashboard::from_tickets(&tickets, RECENT_LIMIT);
        assert_eq!(ids(&dashboard.recent), [6, 5, 4, 3, 2]);
    }

    #[test]
    fn equal_timestamps_list_later_insertion_first() {
        let now = DateTime::<Utc>::UNIX_EPOCH;
        let tickets: Vec<_> = (1..=3).map(|id| ticket(id, TicketStatus::Open, now)).collect();

        let dashboard = Dashboard::from_tickets(&tickets, 2);
        assert_eq!(ids(&dashboard.recent), [3, 2]);
    }

    #[test]
    fn empty_list() {
        let dashboard = Dashboard::from_tickets(&[], RECENT_LIMIT);
        assert_eq!(dashboard.total, 0);
        assert!(dashboard.recent.is_empty());
    }
}
