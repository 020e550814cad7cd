use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// Protected Router Module
///
/// The dashboard pages, grouped by the route group that governs them. Which roles may see a
/// page is decided by the route policy middleware layered over this router, from the group
/// table in the registry.
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        // --- /admin/** : admin ---
        .route("/admin", get(handlers::dashboard_page))
        .route("/admin/projects", get(handlers::dashboard_page))
        // --- /admin/users/** : any authenticated profile ---
        .route("/admin/users", get(handlers::dashboard_page))
        // --- /owner/** : admin, owner ---
        .route("/owner", get(handlers::dashboard_page))
        .route("/owner/projects", get(handlers::dashboard_page))
        // --- /controller/** : admin, owner, controller ---
        .route("/controller", get(handlers::dashboard_page))
        .route("/controller/worksheets", get(handlers::dashboard_page))
        // --- /help/** : admin, owner, controller ---
        .route("/help", get(handlers::dashboard_page))
}
