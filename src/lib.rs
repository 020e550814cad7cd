use axum::{
    Router,
    extract::FromRef,
    http::HeaderName,
    middleware,
};
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

// Access control core.
pub mod dashboard;
pub mod guard;
pub mod navigation;
pub mod redirect;
pub mod registry;
pub mod session;

// Collaborators and plumbing.
pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod repository;

pub mod routes;
use routes::{protected, public};

// --- Public Re-exports ---

pub use config::AppConfig;
pub use registry::RoleRegistry;
pub use repository::{MockProfileRepository, PostgresRepository, RepositoryState, SupabaseRepository};

/// ApiDoc
///
/// OpenAPI document for the JSON API, served at `/api-docs/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    paths(handlers::get_session, handlers::get_navigation),
    components(
        schemas(
            models::Role, models::Profile, models::NavItem, models::AccountMenu,
            models::NavigationView, models::PageView, models::SessionView,
        )
    ),
    tags(
        (name = "dashboard-portal", description = "Role-gated dashboard API")
    )
)]
struct ApiDoc;

/// AppState
///
/// The single shared container for everything a request may need. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    /// Profile lookups against the auth/data collaborator.
    pub repo: RepositoryState,
    /// Role registry and route group table, validated at startup.
    pub registry: Arc<RoleRegistry>,
    /// The loaded, immutable configuration.
    pub config: AppConfig,
}

// --- Axum FromRef Extractor Implementations ---

impl FromRef<AppState> for RepositoryState {
    fn from_ref(app_state: &AppState) -> RepositoryState {
        app_state.repo.clone()
    }
}

impl FromRef<AppState> for AppConfig {
    fn from_ref(app_state: &AppState) -> AppConfig {
        app_state.config.clone()
    }
}

/// create_router
///
/// Assembles the routing structure, applies the route policy middleware to the dashboard
/// pages, and wraps everything in the observability layers.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    let x_request_id = HeaderName::from_static("x-request-id");

    let base_router = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(public::public_routes())
        // Dashboard pages: the middleware resolves the session and applies the route group policy.
        .merge(
            protected::protected_routes().route_layer(middleware::from_fn_with_state(
                state.clone(),
                guard::enforce_route_policy,
            )),
        )
        .with_state(state);

    base_router
        .layer(
            ServiceBuilder::new()
                // Request ID generation, one UUID per incoming request.
                .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace_span_logger)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(tower_http::LatencyUnit::Millis),
                        ),
                )
                .layer(PropagateRequestIdLayer::new(x_request_id)),
        )
        .layer(cors)
}

/// trace_span_logger
///
/// Builds the per-request span, tagged with the `x-request-id` so every log line of a request
/// correlates.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}
