//! Custom Axum extractors.
//!
//! This module contains custom extractors for common HTTP patterns:
//! - `CorrelationId`: The request's correlation ID
//! - `ClientIp`: Client IP address from proxy headers
//! - `UserAgent`: The `User-Agent` header
//!
//! # Examples
//!
//! ```ignore
//! use tracker_web::extractors::{ClientIp, CorrelationId, UserAgent};
//!
//! async fn handler(
//!     correlation_id: CorrelationId,
//!     client_ip: ClientIp,
//!     user_agent: UserAgent,
//! ) -> Result<Json<Response>, AppError> {
//!     tracing::info!(
//!         correlation_id = %correlation_id.0,
//!         client_ip = %client_ip.0,
//!         user_agent = %user_agent.0,
//!         "Processing request"
//!     );
//!     Ok(Json(response))
//! }
//! ```

use crate::middleware::{CorrelationIdExt, CORRELATION_ID_HEADER};
use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, HeaderMap},
};
use std::net::{IpAddr, Ipv4Addr};
use uuid::Uuid;

/// Correlation ID for request tracing.
///
/// Uses the ID assigned by [`correlation_id_layer`](crate::middleware::correlation_id_layer)
/// when the layer is installed, so handlers and response headers agree.
/// Without the layer, reads the `X-Correlation-ID` header or generates a new UUID v4.
#[derive(Debug, Clone, Copy)]
pub struct CorrelationId(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for CorrelationId
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let correlation_id = parts.correlation_id().unwrap_or_else(|| {
            parts
                .headers
                .get(CORRELATION_ID_HEADER)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| Uuid::parse_str(s).ok())
                .unwrap_or_else(Uuid::new_v4)
        });

        Ok(Self(correlation_id))
    }
}

/// Client IP address.
///
/// # Priority
///
/// 1. `X-Forwarded-For` (first IP in the list)
/// 2. `X-Real-IP`
/// 3. Loopback
#[derive(Debug, Clone, Copy)]
pub struct ClientIp(pub IpAddr);

#[async_trait]
impl<S> FromRequestParts<S> for ClientIp
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(extract_client_ip(&parts.headers)))
    }
}

fn extract_client_ip(headers: &HeaderMap) -> IpAddr {
    let forwarded = headers
        .get("X-Forwarded-For")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.split(',').next())
        .and_then(|first| first.trim().parse::<IpAddr>().ok());

    if let Some(ip) = forwarded {
        return ip;
    }

    headers
        .get("X-Real-IP")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().parse::<IpAddr>().ok())
        .unwrap_or(IpAddr::V4(Ipv4Addr::LOCALHOST))
}

/// User-Agent header, or `"Unknown"` when absent.
#[derive(Debug, Clone)]
pub struct UserAgent(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for UserAgent
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_agent = parts
            .headers
            .get("User-Agent")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("Unknown")
            .to_string();

        Ok(Self(user_agent))
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use axum::http::{header, Request};

    fn parts_of(req: Request<()>) -> Parts {
        req.into_parts().0
    }

    #[tokio::test]
    async fn test_correlation_id_from_header() {
        let uuid = Uuid::new_v4();
        let mut parts = parts_of(
            Request::builder()
                .header(CORRELATION_ID_HEADER, uuid.to_string())
                .body(())
                .expect("Valid request"),
        );

        let correlation_id = CorrelationId::from_request_parts(&mut parts, &())
            .await
            .expect("Should extract");

        assert_eq!(correlation_id.0, uuid);
    }

    #[tokio::test]
    async fn test_correlation_id_prefers_extension() {
        let assigned = Uuid::new_v4();
        let mut parts = parts_of(
            Request::builder()
                .header(CORRELATION_ID_HEADER, Uuid::new_v4().to_string())
                .body(())
                .expect("Valid request"),
        );
        parts.extensions.insert(assigned);

        let correlation_id = CorrelationId::from_request_parts(&mut parts, &())
            .await
            .expect("Should extract");

        assert_eq!(correlation_id.0, assigned);
    }

    #[tokio::test]
    async fn test_correlation_id_generates_new() {
        let mut parts = parts_of(Request::builder().body(()).expect("Valid request"));

        let correlation_id = CorrelationId::from_request_parts(&mut parts, &())
            .await
            .expect("Should extract");

        assert_ne!(correlation_id.0, Uuid::nil());
    }

    #[tokio::test]
    async fn test_client_ip_from_x_forwarded_for() {
        let mut parts = parts_of(
            Request::builder()
                .header("X-Forwarded-For", "203.0.113.1, 198.51.100.1")
                .body(())
                .expect("Valid request"),
        );

        let client_ip = ClientIp::from_request_parts(&mut parts, &())
            .await
            .expect("Should extract");

        assert_eq!(client_ip.0.to_string(), "203.0.113.1");
    }

    #[tokio::test]
    async fn test_client_ip_from_x_real_ip() {
        let mut parts = parts_of(
            Request::builder()
                .header("X-Real-IP", "198.51.100.42")
                .body(())
                .expect("Valid request"),
        );

        let client_ip = ClientIp::from_request_parts(&mut parts, &())
            .await
            .expect("Should extract");

        assert_eq!(client_ip.0.to_string(), "198.51.100.42");
    }

    #[tokio::test]
    async fn test_client_ip_fallback() {
        let mut parts = parts_of(Request::builder().body(()).expect("Valid request"));

        let client_ip = ClientIp::from_request_parts(&mut parts, &())
            .await
            .expect("Should extract");

        assert_eq!(client_ip.0.to_string(), "127.0.0.1");
    }

    #[tokio::test]
    async fn test_user_agent() {
        let mut parts = parts_of(
            Request::builder()
                .header(header::USER_AGENT, "Mozilla/5.0 (Test)")
                .body(())
                .expect("Valid request"),
        );
        let user_agent = UserAgent::from_request_parts(&mut parts, &())
            .await
            .expect("Should extract");
        assert_eq!(user_agent.0, "Mozilla/5.0 (Test)");

        let mut parts = parts_of(Request::builder().body(()).expect("Valid request"));
        let user_agent = UserAgent::from_request_parts(&mut parts, &())
            .await
            .expect("Should extract");
        assert_eq!(user_agent.0, "Unknown");
    }
}
