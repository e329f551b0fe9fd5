//! Login, signup, and logout endpoints.
//!
//! - POST /auth/login - Open a session (any non-empty credentials)
//! - POST /auth/signup - Open a session for a named user
//! - POST /auth/logout - End the caller's session (requires auth)
//!
//! Credentials are accepted as given; nothing is verified or stored.

use super::middleware::SessionUser;
use crate::server::state::AppState;
use crate::session::{SessionError, User};
use axum::{body::Bytes, extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use tracker_web::{error::AppError, extractors::{ClientIp, UserAgent}};

/// Request body for login.
#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    /// Account email
    #[serde(default)]
    pub email: Option<String>,
    /// Account password (never checked)
    #[serde(default)]
    pub password: Option<String>,
}

/// Request body for signup.
#[derive(Debug, Default, Deserialize)]
pub struct SignupRequest {
    /// Display name
    #[serde(default)]
    pub name: Option<String>,
    /// Account email
    #[serde(default)]
    pub email: Option<String>,
    /// Account password (never checked)
    #[serde(default)]
    pub password: Option<String>,
}

/// Response carrying the bearer token for a new session.
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    /// Send as `Authorization: Bearer <token>`
    pub token: String,
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn session_error(error: SessionError) -> AppError {
    AppError::internal("Could not open session").with_source(anyhow::Error::new(error))
}

/// Open a session.
///
/// # Example
///
/// ```bash
/// curl -X POST http://localhost:8080/auth/login \
///   -H "Content-Type: application/json" \
///   -d '{"email": "ada@example.com", "password": "secret"}'
/// ```
pub async fn login(
    State(state): State<AppState>,
    ClientIp(client_ip): ClientIp,
    UserAgent(user_agent): UserAgent,
    body: Bytes,
) -> Result<Json<TokenResponse>, AppError> {
    let request: LoginRequest = serde_json::from_slice(&body).unwrap_or_default();

    let (Some(email), Some(_password)) = (present(request.email), present(request.password))
    else {
        tracing::warn!(%client_ip, "Login without credentials");
        return Err(AppError::bad_request("Email and password are required"));
    };

    tracing::debug!(%client_ip, %user_agent, %email, "Login");

    let session = state
        .open_session(User { email, name: None })
        .await
        .map_err(session_error)?;

    Ok(Json(TokenResponse {
        token: session.session_id.to_string(),
    }))
}

/// Open a session for a new user.
///
/// # Example
///
/// ```bash
/// curl -X POST http://localhost:8080/auth/signup \
///   -H "Content-Type: application/json" \
///   -d '{"name": "Ada", "email": "ada@example.com", "password": "secret"}'
/// ```
pub async fn signup(
    State(state): State<AppState>,
    ClientIp(client_ip): ClientIp,
    body: Bytes,
) -> Result<Json<TokenResponse>, AppError> {
    let request: SignupRequest = serde_json::from_slice(&body).unwrap_or_default();

    let (Some(name), Some(email), Some(_password)) = (
        present(request.name),
        present(request.email),
        present(request.password),
    ) else {
        tracing::warn!(%client_ip, "Signup with missing fields");
        return Err(AppError::bad_request("Name, email and password are required"));
    };

    tracing::debug!(%client_ip, %email, "Signup");

    let session = state
        .open_session(User {
            email,
            name: Some(name),
        })
        .await
        .map_err(session_error)?;

    Ok(Json(TokenResponse {
        token: session.session_id.to_string(),
    }))
}

/// End the caller's session, discarding its tickets.
///
/// # Example
///
/// ```bash
/// curl -X POST http://localhost:8080/auth/logout \
///   -H "Authorization: Bearer <token>"
/// ```
pub async fn logout(
    session: SessionUser,
    State(state): State<AppState>,
) -> Result<StatusCode, AppError> {
    match state.close_session(session.session_id()).await {
        // Closed concurrently by another request; the outcome is the same.
        Ok(()) | Err(SessionError::NotFound) => Ok(StatusCode::NO_CONTENT),
        Err(error) => Err(AppError::internal("Could not close session")
            .with_source(anyhow::Error::new(error))),
    }
}
