//! Inventra Server - IT Asset Inventory & Scheduling System
//!
//! A Rust REST API server for IT asset management.

use axum::{
    routing::{delete, get, patch, post, put},
    Router,
};
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use inventra_server::{
    api,
    config::AppConfig,
    repository::Repository,
    services::Services,
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Load configuration
    let config = AppConfig::load().expect("Failed to load configuration");

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("inventra_server={},tower_http=debug", config.logging.level).into());

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Inventra Server v{}", env!("CARGO_PKG_VERSION"));

    // Create database connection pool
    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .connect(&config.database.url)
        .await
        .expect("Failed to connect to database");

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run database migrations");

    tracing::info!("Database migrations completed");

    // Save server address before moving config
    let server_host = config.server.host.clone();
    let server_port = config.server.port;

    // Create repository and services
    let repository = Repository::new(pool);
    let services = Services::new(repository, config.auth.clone(), &config.storage);

    // Create application state
    let state = AppState {
        config: Arc::new(config),
        services: Arc::new(services),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::new(
        server_host.parse().expect("Invalid host address"),
        server_port,
    );

    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes
fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // API v1 routes
    let api_v1 = Router::new()
        // Health check
        .route("/health", get(api::health::health_check))
        .route("/ready", get(api::health::readiness_check))
        // Authentication
        .route("/auth/login", post(api::auth::login))
        .route("/auth/me", get(api::auth::me))
        // Own profile
        .route("/profile", get(api::users::get_my_profile))
        .route("/profile", put(api::users::update_my_profile))
        .route("/profile/photo", post(api::users::upload_profile_photo))
        // Users (admin)
        .route("/users", get(api::users::list_users))
        .route("/users", post(api::users::create_user))
        .route("/users/:id", get(api::users::get_user))
        .route("/users/:id", put(api::users::update_user))
        .route("/users/:id", delete(api::users::delete_user))
        // Equipment
        .route("/equipment", get(api::equipment::list_equipment))
        .route("/equipment", post(api::equipment::create_equipment))
        .route("/equipment/bulk", post(api::equipment::bulk_create_equipment))
        .route("/equipment/:id", get(api::equipment::get_equipment))
        .route("/equipment/:id", put(api::equipment::update_equipment))
        .route("/equipment/:id", delete(api::equipment::delete_equipment))
        .route("/equipment/:id/invoice", post(api::equipment::attach_invoice))
        // Consumables
        .route("/consumables", get(api::consumables::list_consumables))
        .route("/consumables", post(api::consumables::create_consumable))
        .route("/consumables/:id", get(api::consumables::get_consumable))
        .route("/consumables/:id", put(api::consumables::update_consumable))
        .route("/consumables/:id", delete(api::consumables::delete_consumable))
        // Reservations
        .route("/reservations", get(api::reservations::list_reservations))
        .route("/reservations", post(api::reservations::create_reservation))
        .route("/reservations/:id", get(api::reservations::get_reservation))
        .route("/reservations/:id", put(api::reservations::update_reservation))
        .route("/reservations/:id", delete(api::reservations::delete_reservation))
        // Catalogs
        .route("/equipment-types", get(api::catalogs::list_types))
        .route("/equipment-types", post(api::catalogs::create_type))
        .route("/statuses", get(api::catalogs::list_statuses))
        .route("/statuses", post(api::catalogs::create_status))
        .route("/suppliers", get(api::catalogs::list_suppliers))
        .route("/suppliers", post(api::catalogs::create_supplier))
        .route("/branches", get(api::catalogs::list_branches))
        .route("/branches", post(api::catalogs::create_branch))
        // Activities, tasks and notifications
        .route("/activities", get(api::activities::list_activities))
        .route("/notifications", get(api::activities::list_notifications))
        .route("/tasks", get(api::activities::list_tasks))
        .route("/tasks", post(api::activities::create_task))
        .route("/tasks/:id", get(api::activities::get_task))
        .route("/tasks/:id", put(api::activities::update_task))
        .route("/tasks/:id", delete(api::activities::delete_task))
        .route("/tasks/:id/complete", patch(api::activities::complete_task))
        // Audit trail (admin)
        .route("/audit", get(api::audit::list_audit))
        // Dashboard
        .route("/dashboard", get(api::stats::get_dashboard))
        .with_state(state.clone());

    // OpenAPI documentation
    let openapi = api::openapi::create_openapi_router();

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
