use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post},
};

/// Public Router Module
///
/// Endpoints that work without a session.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /health
        // Liveness probe for load balancers; does not touch the database.
        .route("/health", get(|| async { "ok" }))
        // POST /admin.login
        // Exchanges email + password for a `session_id` cookie.
        .route("/admin.login", post(handlers::login))
}
