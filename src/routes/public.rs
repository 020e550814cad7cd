use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// Public Router Module
///
/// Endpoints that never redirect for lack of access. The session is still resolved where a
/// handler needs it, but an anonymous session is a normal input here.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /health
        // Liveness probe for load balancers.
        .route("/health", get(|| async { "ok" }))
        // GET /
        // Dashboard router: role home for authenticated sessions, /login otherwise.
        .route("/", get(handlers::dashboard_root))
        // GET /login
        .route("/login", get(handlers::login_page))
        // GET /api/session
        .route("/api/session", get(handlers::get_session))
        // GET /api/navigation?path=...
        .route("/api/navigation", get(handlers::get_navigation))
}
