use axum::{
    Json,
    Extension,
    extract::{OriginalUri, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use crate::{
    AppState,
    dashboard::{DashboardRouter, landing_path},
    models::{AccountMenu, NavigationView, PageView, SessionView},
    navigation::{self, compose},
    registry::LOGIN_PATH,
    session::Session,
};

// --- Query Structs ---

/// NavigationQuery
///
/// Query parameters for GET /api/navigation.
#[derive(Deserialize, utoipa::IntoParams)]
pub struct NavigationQuery {
    /// Current location; the entry with exactly this href is marked active.
    pub path: Option<String>,
}

// --- Handlers ---

/// dashboard_root
///
/// [Public Route] Entry point. Sends authenticated sessions to their role's dashboard and
/// everyone else to the login page.
pub async fn dashboard_root(State(state): State<AppState>, session: Session) -> Response {
    let mut router = DashboardRouter::new(&state.registry);

    match router.on_session(&session) {
        Some(navigation) => navigation.into_response(),
        // Only reachable with a session still resolving.
        None => (
            StatusCode::ACCEPTED,
            Json(serde_json::json!({ "status": "loading" })),
        )
            .into_response(),
    }
}

/// login_page
///
/// [Public Route] The login page shell. Credentials are exchanged with the auth provider
/// directly by the browser; this only renders the surrounding chrome.
pub async fn login_page(State(state): State<AppState>, session: Session) -> Json<PageView> {
    Json(PageView {
        title: "Login".to_string(),
        path: LOGIN_PATH.to_string(),
        navigation: compose(&state.registry, &session, LOGIN_PATH),
    })
}

/// get_session
///
/// [Public Route] Describes the current session: profile, landing path and account menu.
#[utoipa::path(
    get,
    path = "/api/session",
    responses((status = 200, description = "Current session", body = SessionView))
)]
pub async fn get_session(State(state): State<AppState>, session: Session) -> Json<SessionView> {
    let home = landing_path(&state.registry, &session).to_string();
    let account: AccountMenu = navigation::account_menu(&session);

    Json(SessionView {
        profile: session.profile,
        home,
        account,
    })
}

/// get_navigation
///
/// [Public Route] The sidebar for the current session at `path`.
#[utoipa::path(
    get,
    path = "/api/navigation",
    params(NavigationQuery),
    responses((status = 200, description = "Sidebar entries", body = NavigationView))
)]
pub async fn get_navigation(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<NavigationQuery>,
) -> Json<NavigationView> {
    let path = query.path.unwrap_or_default();
    Json(compose(&state.registry, &session, &path))
}

/// dashboard_page
///
/// [Protected Route] Serves any dashboard page. Reaching this handler means the route policy
/// middleware already admitted the session. The title comes from the matching sidebar entry.
pub async fn dashboard_page(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    OriginalUri(uri): OriginalUri,
) -> Json<PageView> {
    let path = uri.path();
    let navigation = compose(&state.registry, &session, path);

    let title = navigation
        .entries
        .iter()
        .find(|entry| entry.active)
        .map(|entry| entry.title.clone())
        .unwrap_or_else(|| title_from_path(path));

    Json(PageView {
        title,
        path: path.to_string(),
        navigation,
    })
}

/// Falls back to the last path segment, capitalised: `/admin/projects` → `Projects`.
fn title_from_path(path: &str) -> String {
    let segment = path
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or_default();

    let mut chars = segment.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => "Dashboard".to_string(),
    }
}
