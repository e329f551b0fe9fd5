//! Router configuration for the ticket tracker.

use super::state::AppState;
use crate::api::tickets;
use crate::auth;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;
use tracker_web::{correlation_id_layer, handlers::health_check};

/// Build the complete Axum router.
///
/// - `/health` (no authentication)
/// - `/auth/login`, `/auth/signup`, `/auth/logout`
/// - `/api/tickets`, `/api/tickets/:id`, `/api/dashboard`
///
/// Every response carries an `X-Correlation-ID` header.
pub fn build_router(state: AppState) -> Router {
    let auth_routes = Router::new()
        .route("/login", post(auth::login))
        .route("/signup", post(auth::signup))
        .route("/logout", post(auth::logout));

    let api_routes = Router::new()
        .route(
            "/tickets",
            get(tickets::list_tickets).post(tickets::create_ticket),
        )
        .route(
            "/tickets/:id",
            get(tickets::get_ticket)
                .put(tickets::update_ticket)
                .delete(tickets::delete_ticket),
        )
        .route("/dashboard", get(tickets::dashboard));

    Router::new()
        .route("/health", get(health_check))
        .nest("/auth", auth_routes)
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(correlation_id_layer())
        .with_state(state)
}
