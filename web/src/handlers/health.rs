//! Health check endpoints.
//!
//! Used by load balancers and monitoring systems to verify the service is up.

use axum::{http::StatusCode, Json};
use serde::Serialize;

/// Liveness response body.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Always `"ok"` while the process serves requests
    pub status: &'static str,
    /// Crate version of the running service
    pub version: &'static str,
}

/// Simple health check endpoint (for basic liveness).
///
/// Does not touch any session or ticket state.
///
/// ```text
/// GET /health
/// ```
///
/// ```json
/// { "status": "ok", "version": "0.1.0" }
/// ```
#[allow(clippy::unused_async)]
pub async fn health_check() -> (StatusCode, Json<HealthResponse>) {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "ok",
            version: env!("CARGO_PKG_VERSION"),
        }),
    )
}
