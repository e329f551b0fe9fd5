//! # Ticket Tracker
//!
//! A session-scoped ticket tracking service.
//!
//! Users log in (any non-empty credentials), then create, list, filter,
//! update, and delete tickets. Tickets live in memory and belong to the
//! session that created them; logging out or letting the session expire
//! discards them.
//!
//! ## Architecture
//!
//! - [`types`]: tickets, filters, actions, and the per-session state
//! - [`validation`]: field rules for submitted tickets
//! - [`reducer`]: ticket commands as a pure reducer
//! - [`dashboard`]: status counts and recent tickets
//! - [`session`]: sessions, each owning a ticket store
//! - [`auth`], [`api`], [`server`]: the HTTP surface
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use tracker::{build_router, AppState, Config};
//! use tracker_core::environment::SystemClock;
//!
//! let state = AppState::new(Config::from_env(), Arc::new(SystemClock));
//! let app = build_router(state);
//! ```

pub mod api;
pub mod auth;
pub mod config;
pub mod dashboard;
pub mod reducer;
pub mod server;
pub mod session;
pub mod types;
pub mod validation;

pub use config::Config;
pub use dashboard::Dashboard;
pub use reducer::{TicketEnvironment, TicketReducer};
pub use server::{build_router, spawn_session_sweeper, AppState};
pub use session::{MemorySessionStore, Session, SessionError, SessionId, SessionStore, TicketStore, User};
pub use types::{
    Ticket, TicketAction, TicketError, TicketFilters, TicketId, TicketInput, TicketState,
    TicketStatus, ValidationErrors,
};
