use dashboard_portal::{
    AppState, RoleRegistry,
    config::{AppConfig, Env, ProfileBackend},
    create_router,
    repository::{MockProfileRepository, PostgresRepository, RepositoryState, SupabaseRepository},
};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// main
///
/// Initializes configuration, logging, the role registry, the profile store and the HTTP
/// server, in that order.
#[tokio::main]
async fn main() {
    // 1. Configuration (fail-fast)
    dotenv::dotenv().ok();
    let config = AppConfig::load();

    // 2. Logging: RUST_LOG wins, otherwise development defaults.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "dashboard_portal=debug,tower_http=info,axum=trace".into());

    match config.env {
        Env::Local => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
        Env::Production => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
    }

    tracing::info!("Application starting in {:?} mode", config.env);

    // 3. Role registry, validated against the route group table before anything is served.
    let registry = match RoleRegistry::builtin() {
        Ok(registry) => Arc::new(registry),
        Err(e) => {
            tracing::error!("FATAL: invalid role registry: {}", e);
            std::process::exit(1);
        }
    };

    // 4. Profile store
    let repo: RepositoryState = match config.profile_backend {
        ProfileBackend::Postgres => {
            let pool = PgPoolOptions::new()
                .max_connections(5)
                .connect(&config.db_url)
                .await
                .expect("FATAL: Failed to connect to Postgres. Check DATABASE_URL.");
            Arc::new(PostgresRepository::new(pool))
        }
        ProfileBackend::Supabase => Arc::new(SupabaseRepository::new(
            &config.supabase_url,
            &config.supabase_key,
        )),
        ProfileBackend::Memory => {
            tracing::warn!("Using the empty in-memory profile store; every session is anonymous.");
            Arc::new(MockProfileRepository::default())
        }
    };
    tracing::info!("Profile backend: {:?}", config.profile_backend);

    // 5. Router and server
    let bind_addr = config.bind_addr.clone();
    let app = create_router(AppState {
        repo,
        registry,
        config,
    });

    let listener = TcpListener::bind(&bind_addr)
        .await
        .expect("FATAL: Failed to bind listen address. Check BIND_ADDR.");

    tracing::info!("Listening on {}", bind_addr);
    tracing::info!("API Documentation (Swagger UI) available at: http://{}/swagger-ui", bind_addr);

    axum::serve(listener, app)
        .await
        .expect("FATAL: HTTP server terminated unexpectedly.");
}
