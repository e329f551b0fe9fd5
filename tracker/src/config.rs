//! Configuration management for the ticket tracker.
//!
//! Loads configuration from environment variables with sensible defaults.
//! Values that fail to parse fall back to the default.

use crate::dashboard::RECENT_LIMIT;
use crate::reducer::DEFAULT_PRIORITY;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// HTTP server configuration
    pub server: ServerConfig,
    /// Session lifetime configuration
    pub session: SessionConfig,
    /// Ticket behavior configuration
    pub tickets: TicketConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,
    /// Port to bind to
    pub port: u16,
    /// `tracing` filter directives, e.g. `info,tracker=debug`
    pub log_level: String,
    /// Graceful shutdown timeout in seconds
    pub shutdown_timeout: u64,
    /// How long a request waits for its ticket command to complete, in milliseconds
    pub request_timeout_ms: u64,
}

/// Session lifetime configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Seconds a session stays valid after login
    pub ttl: u64,
    /// Seconds between sweeps that drop expired sessions
    pub purge_interval: u64,
}

/// Ticket behavior configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TicketConfig {
    /// Priority assigned when a ticket is created without one
    pub default_priority: String,
    /// Number of tickets in the dashboard's recent list
    pub recent_limit: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            log_level: "info,tracker=debug".to_string(),
            shutdown_timeout: 30,
            request_timeout_ms: 5000,
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ttl: 86_400,
            purge_interval: 60,
        }
    }
}

impl Default for TicketConfig {
    fn default() -> Self {
        Self {
            default_priority: DEFAULT_PRIORITY.to_string(),
            recent_limit: RECENT_LIMIT,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Call `dotenvy::dotenv()` first to pick up a `.env` file.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            server: ServerConfig {
                host: env::var("HOST").unwrap_or(defaults.server.host),
                port: env::var("PORT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(defaults.server.port),
                log_level: env::var("RUST_LOG").unwrap_or(defaults.server.log_level),
                shutdown_timeout: env::var("SHUTDOWN_TIMEOUT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(defaults.server.shutdown_timeout),
                request_timeout_ms: env::var("REQUEST_TIMEOUT_MS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(defaults.server.request_timeout_ms),
            },
            session: SessionConfig {
                ttl: env::var("SESSION_TTL")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(defaults.session.ttl),
                purge_interval: env::var("SESSION_PURGE_INTERVAL")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .filter(|secs| *secs > 0)
                    .unwrap_or(defaults.session.purge_interval),
            },
            tickets: TicketConfig {
                default_priority: env::var("DEFAULT_PRIORITY")
                    .unwrap_or(defaults.tickets.default_priority),
                recent_limit: env::var("RECENT_LIMIT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(defaults.tickets.recent_limit),
            },
        }
    }

    /// Log filter built from `log_level`, or plain `info` if it does not parse
    #[must_use]
    pub fn log_filter(&self) -> tracing_subscriber::EnvFilter {
        tracing_subscriber::EnvFilter::try_new(&self.server.log_level)
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"))
    }

    /// Address the server binds to
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Graceful shutdown budget
    #[must_use]
    pub const fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.server.shutdown_timeout)
    }

    /// Budget for one ticket command
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.server.request_timeout_ms)
    }

    /// Lifetime of a new session
    #[must_use]
    pub fn session_ttl(&self) -> chrono::Duration {
        i64::try_from(self.session.ttl)
            .ok()
            .and_then(chrono::Duration::try_seconds)
            .unwrap_or(chrono::Duration::MAX)
    }

    /// Interval between expired-session sweeps
    #[must_use]
    pub const fn purge_interval(&self) -> Duration {
        Duration::from_secs(self.session.purge_interval)
    }
}
