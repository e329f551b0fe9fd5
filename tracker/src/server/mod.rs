//! HTTP server for the ticket tracker.
//!
//! - Application state (sessions, configuration, clock)
//! - Router configuration
//! - Background sweep of expired sessions

pub mod routes;
pub mod state;

pub use routes::build_router;
pub use state::AppState;

use std::time::Duration;
use tokio::task::JoinHandle;

/// Spawn a task that drops expired sessions every `purge_interval`.
///
/// The task runs until aborted.
#[must_use]
pub fn spawn_session_sweeper(state: AppState) -> JoinHandle<()> {
    let period = state.config.purge_interval().max(Duration::from_secs(1));

    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            interval.tick().await;
            if let Err(error) = state.purge_expired_sessions().await {
                tracing::error!(%error, "Session sweep failed");
            }
        }
    })
}
