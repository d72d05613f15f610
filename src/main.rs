mod churn;
mod concentration;
mod config;
mod db;
mod errors;
mod features;
mod geo_engine;
mod handlers;
mod ml_engine;
mod models;
mod recommendations;
mod repository;
mod scoring;
mod segmentation;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::db::Database;

/// Main entry point for the application.
///
/// Initializes logging, configuration and the database pool, wires up the
/// HTTP routes and starts the Axum server. The HTTP layer is thin glue:
/// every analytics endpoint invokes one of the two pipelines synchronously
/// and forwards its structured result verbatim.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lead_intel_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;

    // Initialize database connection pool
    let db = Database::new(&config.database_url).await?;
    tracing::info!("Database connection pool established");

    // Build application state
    let app_state = Arc::new(handlers::AppState {
        db: db.pool.clone(),
        config: config.clone(),
    });

    // Analytics routes
    let api_routes = Router::new()
        // ML pipeline endpoints
        .route("/api/v1/score-all-leads", post(handlers::score_all_leads))
        .route("/api/v1/summary", get(handlers::get_summary))
        .route("/api/v1/top-leads/:limit", get(handlers::get_top_leads))
        .route("/api/v1/at-risk-leads", get(handlers::get_at_risk_leads))
        .route(
            "/api/v1/recommendations",
            get(handlers::get_recommendations),
        )
        // Geographical pipeline endpoints
        .route(
            "/api/v1/geographical-analysis",
            post(handlers::geographical_analysis),
        )
        .route("/api/v1/countries", get(handlers::get_countries))
        .route(
            "/api/v1/market-recommendations",
            get(handlers::get_market_recommendations),
        )
        .layer(
            // Request size limit: 1MB max payload (analytics endpoints carry no body)
            ServiceBuilder::new().layer(RequestBodyLimitLayer::new(1024 * 1024)),
        );

    // Build final app with root and health endpoints
    let app = Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .merge(api_routes)
        .with_state(app_state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
