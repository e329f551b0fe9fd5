//! Reducer for a session's tickets.
//!
//! Commands validate, change state, and answer with one outcome event
//! carrying the command's correlation id. Outcome events describe a change
//! that already happened, so when the runtime feeds them back they leave
//! state untouched.

use crate::types::{Ticket, TicketAction, TicketId, TicketInput, TicketState};
use crate::validation;
use std::sync::Arc;
use tracker_core::{effect::Effect, environment::Clock, reducer::Reducer, smallvec, SmallVec};
use uuid::Uuid;

/// Priority given to tickets created without one
pub const DEFAULT_PRIORITY: &str = "medium";

/// Environment dependencies for the ticket reducer
#[derive(Clone)]
pub struct TicketEnvironment {
    /// Clock for creation timestamps
    pub clock: Arc<dyn Clock>,
    /// Priority given to tickets created without one
    pub default_priority: String,
}

impl TicketEnvironment {
    /// Creates an environment with the standard default priority
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            default_priority: DEFAULT_PRIORITY.to_string(),
        }
    }

    /// Use a different default priority
    #[must_use]
    pub fn with_default_priority(mut self, priority: impl Into<String>) -> Self {
        self.default_priority = priority.into();
        self
    }
}

/// Reducer for the ticket list
#[derive(Clone, Debug, Default)]
pub struct TicketReducer;

impl TicketReducer {
    /// Creates a new `TicketReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn create(
        state: &mut TicketState,
        correlation_id: Uuid,
        input: TicketInput,
        env: &TicketEnvironment,
    ) -> TicketAction {
        let status = match validation::validated_status(&input) {
            Ok(status) => status,
            Err(errors) => {
                return TicketAction::ValidationFailed {
                    correlation_id,
                    errors,
                };
            },
        };

        let ticket = Ticket {
            id: state.next_id(),
            title: input.title.unwrap_or_default(),
            description: input.description.unwrap_or_default(),
            status,
            priority: input
                .priority
                .unwrap_or_else(|| env.default_priority.clone()),
            created: env.clock.now(),
        };

        tracing::info!(ticket_id = %ticket.id, status = %ticket.status, "Ticket created");
        state.push(ticket.clone());

        TicketAction::TicketCreated {
            correlation_id,
            ticket,
        }
    }

    fn update(
        state: &mut TicketState,
        correlation_id: Uuid,
        id: TicketId,
        input: TicketInput,
    ) -> TicketAction {
        if !state.exists(id) {
            return TicketAction::TicketNotFound { correlation_id, id };
        }

        let status = match validation::validated_status(&input) {
            Ok(status) => status,
            Err(errors) => {
                return TicketAction::ValidationFailed {
                    correlation_id,
                    errors,
                };
            },
        };

        let Some(ticket) = state.get_mut(id) else {
            return TicketAction::TicketNotFound { correlation_id, id };
        };

        ticket.title = input.title.unwrap_or_default();
        ticket.status = status;
        if let Some(description) = input.description {
            ticket.description = description;
        }
        if let Some(priority) = input.priority {
            ticket.priority = priority;
        }

        tracing::info!(ticket_id = %id, status = %status, "Ticket updated");

        TicketAction::TicketUpdated {
            correlation_id,
            ticket: ticket.clone(),
        }
    }

    fn delete(state: &mut TicketState, correlation_id: Uuid, id: TicketId) -> TicketAction {
        if state.remove(id).is_none() {
            return TicketAction::TicketNotFound { correlation_id, id };
        }

        tracing::info!(ticket_id = %id, "Ticket deleted");
        TicketAction::TicketDeleted { correlation_id, id }
    }
}

impl Reducer for TicketReducer {
    type State = TicketState;
    type Action = TicketAction;
    type Environment = TicketEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        let outcome = match action {
            // ========== Commands ==========
            TicketAction::CreateTicket {
                correlation_id,
                input,
            } => Self::create(state, correlation_id, input, env),

            TicketAction::UpdateTicket {
                correlation_id,
                id,
                input,
            } => Self::update(state, correlation_id, id, input),

            TicketAction::DeleteTicket { correlation_id, id } => {
                Self::delete(state, correlation_id, id)
            },

            // ========== Events ==========
            TicketAction::TicketCreated { .. }
            | TicketAction::TicketUpdated { .. }
            | TicketAction::TicketDeleted { .. }
            | TicketAction::TicketNotFound { .. }
            | TicketAction::ValidationFailed { .. } => return SmallVec::new(),
        };

        smallvec![Effect::emit(outcome)]
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::types::TicketStatus;
    use crate::validation::{INVALID_STATUS, TITLE_REQUIRED};
    use tracker_testing::{assertions, mocks::epoch, test_clock, ReducerTest};

    fn env() -> TicketEnvironment {
        TicketEnvironment::new(Arc::new(test_clock()))
    }

    fn input(title: &str, status: &str) -> TicketInput {
        TicketInput {
            title: Some(title.to_string()),
            status: Some(status.to_string()),
            ..TicketInput::default()
        }
    }

    fn seeded(titles: &[&str]) -> TicketState {
        let mut state = TicketState::new();
        for title in titles {
            let id = state.next_id();
            state.push(Ticket {
                id,
                title: (*title).to_string(),
                description: String::new(),
                status: TicketStatus::Open,
                priority: DEFAULT_PRIORITY.to_string(),
                created: epoch(),
            });
        }
        state
    }

    #[test]
    fn create_appends_with_defaults() {
        let cid = Uuid::new_v4();

        ReducerTest::new(TicketReducer::new())
            .with_env(env())
            .given_state(TicketState::new())
            .when_action(TicketAction::CreateTicket {
                correlation_id: cid,
                input: input("Fix login", "open"),
            })
            .then_state(|state| {
                assert_eq!(state.count(), 1);
                let ticket = state.get(TicketId::new(1)).unwrap();
                assert_eq!(ticket.title, "Fix login");
                assert_eq!(ticket.description, "");
                assert_eq!(ticket.priority, "medium");
                assert_eq!(ticket.status, TicketStatus::Open);
                assert_eq!(ticket.created, epoch());
            })
            .then_effects(assertions::assert_has_future_effect)
            .then_emitted(move |actions| {
                assert!(matches!(
                    actions,
                    [TicketAction::TicketCreated { correlation_id, ticket }]
                        if *correlation_id == cid && ticket.id == TicketId::new(1)
                ));
            })
            .run();
    }

    #[test]
    fn create_uses_configured_default_priority() {
        ReducerTest::new(TicketReducer::new())
            .with_env(env().with_default_priority("low"))
            .given_state(TicketState::new())
            .when_action(TicketAction::CreateTicket {
                correlation_id: Uuid::new_v4(),
                input: input("Fix login", "open"),
            })
            .then_state(|state| {
                assert_eq!(state.tickets()[0].priority, "low");
            })
            .run();
    }

    #[test]
    fn create_keeps_supplied_optional_fields() {
        ReducerTest::new(TicketReducer::new())
            .with_env(env())
            .given_state(seeded(&["first"]))
            .when_action(TicketAction::CreateTicket {
                correlation_id: Uuid::new_v4(),
                input: TicketInput {
                    description: Some("Steps to reproduce".to_string()),
                    priority: Some("high".to_string()),
                    ..input("Crash", "in_progress")
                },
            })
            .then_state(|state| {
                let ticket = state.get(TicketId::new(2)).unwrap();
                assert_eq!(ticket.description, "Steps to reproduce");
                assert_eq!(ticket.priority, "high");
                assert_eq!(ticket.status, TicketStatus::InProgress);
            })
            .run();
    }

    #[test]
    fn create_rejects_invalid_input_without_mutation() {
        let cid = Uuid::new_v4();

        ReducerTest::new(TicketReducer::new())
            .with_env(env())
            .given_state(seeded(&["first"]))
            .when_action(TicketAction::CreateTicket {
                correlation_id: cid,
                input: input("", "bogus"),
            })
            .then_state(|state| {
                assert_eq!(state.count(), 1);
                assert_eq!(state.next_id(), TicketId::new(2));
            })
            .then_emitted(move |actions| {
                let [TicketAction::ValidationFailed { correlation_id, errors }] = actions else {
                    panic!("expected ValidationFailed, got {actions:?}");
                };
                assert_eq!(*correlation_id, cid);
                assert_eq!(errors.get("title"), Some(TITLE_REQUIRED));
                assert_eq!(errors.get("status"), Some(INVALID_STATUS));
            })
            .run();
    }

    #[test]
    fn update_overwrites_only_supplied_fields() {
        let mut state = seeded(&["Fix login"]);
        if let Some(ticket) = state.get_mut(TicketId::new(1)) {
            ticket.description = "keep me".to_string();
        }

        ReducerTest::new(TicketReducer::new())
            .with_env(env())
            .given_state(state)
            .when_action(TicketAction::UpdateTicket {
                correlation_id: Uuid::new_v4(),
                id: TicketId::new(1),
                input: input("Fix login", "closed"),
            })
            .then_state(|state| {
                let ticket = state.get(TicketId::new(1)).unwrap();
                assert_eq!(ticket.title, "Fix login");
                assert_eq!(ticket.status, TicketStatus::Closed);
                assert_eq!(ticket.description, "keep me");
                assert_eq!(ticket.priority, "medium");
                assert_eq!(ticket.created, epoch());
            })
            .then_emitted(|actions| {
                assert!(matches!(
                    actions,
                    [TicketAction::TicketUpdated { ticket, .. }] if ticket.status == TicketStatus::Closed
                ));
            })
            .run();
    }

    #[test]
    fn update_of_missing_ticket_is_not_found_before_validation() {
        ReducerTest::new(TicketReducer::new())
            .with_env(env())
            .given_state(seeded(&["only"]))
            .when_action(TicketAction::UpdateTicket {
                correlation_id: Uuid::new_v4(),
                id: TicketId::new(9),
                input: TicketInput::default(),
            })
            .then_emitted(|actions| {
                assert!(matches!(
                    actions,
                    [TicketAction::TicketNotFound { id, .. }] if *id == TicketId::new(9)
                ));
            })
            .run();
    }

    #[test]
    fn update_with_invalid_input_leaves_ticket_alone() {
        ReducerTest::new(TicketReducer::new())
            .with_env(env())
            .given_state(seeded(&["Fix login"]))
            .when_action(TicketAction::UpdateTicket {
                correlation_id: Uuid::new_v4(),
                id: TicketId::new(1),
                input: input("  ", "closed"),
            })
            .then_state(|state| {
                let ticket = state.get(TicketId::new(1)).unwrap();
                assert_eq!(ticket.title, "Fix login");
                assert_eq!(ticket.status, TicketStatus::Open);
            })
            .then_emitted(|actions| {
                assert!(matches!(actions, [TicketAction::ValidationFailed { .. }]));
            })
            .run();
    }

    #[test]
    fn delete_removes_and_preserves_order() {
        ReducerTest::new(TicketReducer::new())
            .with_env(env())
            .given_state(seeded(&["a", "b", "c"]))
            .when_action(TicketAction::DeleteTicket {
                correlation_id: Uuid::new_v4(),
                id: TicketId::new(2),
            })
            .then_state(|state| {
                let titles: Vec<_> = state.tickets().iter().map(|t| t.title.as_str()).collect();
                assert_eq!(titles, ["a", "c"]);
                assert_eq!(state.next_id(), TicketId::new(4));
            })
            .then_emitted(|actions| {
                assert!(matches!(actions, [TicketAction::TicketDeleted { .. }]));
            })
            .run();
    }

    #[test]
    fn delete_of_missing_ticket_is_not_found() {
        ReducerTest::new(TicketReducer::new())
            .with_env(env())
            .given_state(seeded(&["a"]))
            .when_action(TicketAction::DeleteTicket {
                correlation_id: Uuid::new_v4(),
                id: TicketId::new(5),
            })
            .then_state(|state| assert_eq!(state.count(), 1))
            .then_emitted(|actions| {
                assert!(matches!(actions, [TicketAction::TicketNotFound { .. }]));
            })
            .run();
    }

    #[test]
    fn late_created_event_does_not_resurrect_deleted_ticket() {
        let mut state = seeded(&["a"]);
        let ticket = state.tickets()[0].clone();
        state.remove(ticket.id);

        ReducerTest::new(TicketReducer::new())
            .with_env(env())
            .given_state(state)
            .when_action(TicketAction::TicketCreated {
                correlation_id: Uuid::new_v4(),
                ticket,
            })
            .then_state(|state| assert_eq!(state.count(), 0))
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn late_updated_event_does_not_roll_back() {
        let state = seeded(&["current"]);
        let mut stale = state.tickets()[0].clone();
        stale.title = "stale".to_string();

        ReducerTest::new(TicketReducer::new())
            .with_env(env())
            .given_state(state)
            .when_action(TicketAction::TicketUpdated {
                correlation_id: Uuid::new_v4(),
                ticket: stale,
            })
            .then_state(|state| assert_eq!(state.tickets()[0].title, "current"))
            .then_effects(assertions::assert_no_effects)
            .run();
    }
}
