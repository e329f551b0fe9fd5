//! Axum integration for the ticket tracker.
//!
//! The HTTP layer is the imperative shell around the reducers: it parses
//! requests, builds actions, dispatches them through a `Store`, and maps the
//! outcome back to a response.
//!
//! # Request Flow
//!
//! 1. **HTTP Request** arrives at an Axum handler
//! 2. **Extract data** from request (JSON, headers, bearer token)
//! 3. **Build Action** from extracted data
//! 4. **Dispatch** action through `Store::send_and_wait_for`
//! 5. **Map result** to HTTP response (or [`AppError`])
//!
//! # Example
//!
//! ```ignore
//! use tracker_web::{AppError, CorrelationId};
//!
//! async fn create(
//!     correlation_id: CorrelationId,
//!     Json(input): Json<TicketInput>,
//! ) -> Result<Json<Ticket>, AppError> {
//!     let action = TicketAction::CreateTicket { correlation_id: correlation_id.0, input };
//!     let outcome = store
//!         .send_and_wait_for(action, TicketAction::is_event, timeout)
//!         .await?;
//!     // ...
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;

// Re-export key types for convenience
pub use error::AppError;
pub use extractors::{ClientIp, CorrelationId, UserAgent};
pub use middleware::{correlation_id_layer, CorrelationIdExt, CORRELATION_ID_HEADER};
