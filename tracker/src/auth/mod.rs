//! Authentication for the ticket tracker.
//!
//! Sessions are opened by login or signup and carried as bearer tokens.

pub mod handlers;
pub mod middleware;

pub use handlers::{login, logout, signup, TokenResponse};
pub use middleware::{BearerToken, SessionUser};
