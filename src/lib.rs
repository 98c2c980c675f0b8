//! Trivia Backend - library for app logic and testing

pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod logging;
pub mod routes;

use anyhow::Context;
use axum::{
    http::{HeaderValue, Method},
    middleware,
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{
    catch_panic::CatchPanicLayer, compression::CompressionLayer, cors::CorsLayer,
    limit::RequestBodyLimitLayer, trace::TraceLayer,
};

use crate::config::ServerConfig;
use crate::db::{MemoryStore, PgStore, TriviaStore};

/// Shared handler state. The store is the only thing requests share.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn TriviaStore>,
}

impl AppState {
    pub fn new(store: impl TriviaStore + 'static) -> Self {
        Self {
            store: Arc::new(store),
        }
    }
}

/// Configure CORS from environment variables.
/// Uses ALLOWED_ORIGINS (comma-separated) or FRONTEND_ORIGIN.
/// Falls back to the local frontend dev servers.
pub fn configure_cors() -> CorsLayer {
    let allowed_origins = std::env::var("ALLOWED_ORIGINS")
        .ok()
        .and_then(|s| {
            let origins: Vec<HeaderValue> = s
                .split(',')
                .filter_map(|origin| origin.trim().parse().ok())
                .collect();
            if origins.is_empty() {
                None
            } else {
                Some(origins)
            }
        })
        .or_else(|| {
            std::env::var("FRONTEND_ORIGIN")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(|origin| vec![origin])
        })
        .unwrap_or_else(|| {
            vec![
                HeaderValue::from_static("http://localhost:3000"),
                HeaderValue::from_static("http://127.0.0.1:3000"),
            ]
        });

    CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            axum::http::header::AUTHORIZATION,
        ])
        .allow_credentials(true)
}

/// Create and configure the application router.
pub fn create_app(state: AppState) -> Router {
    let cors = configure_cors();

    Router::new()
        .route("/categories", get(routes::categories::list_categories))
        .route(
            "/categories/{category_id}/questions",
            get(routes::categories::questions_by_category),
        )
        .route(
            "/questions",
            get(routes::questions::list_questions).post(routes::questions::create_question),
        )
        .route(
            "/questions/{question_id}",
            delete(routes::questions::delete_question),
        )
        .route(
            "/questions/searches",
            post(routes::questions::search_questions),
        )
        .route("/quizzes", post(routes::quizzes::next_quiz_question))
        .route("/health", get(routes::health::health_ping))
        .route("/health/database", get(routes::health::health_database))
        .route("/health/ready", get(routes::health::health_ready))
        .fallback(error::not_found)
        .method_not_allowed_fallback(error::method_not_allowed)
        .with_state(state)
        .layer(CatchPanicLayer::custom(error::panic_response))
        .layer(logging::middleware::propagate_request_id_layer())
        .layer(middleware::from_fn(logging::middleware::log_request))
        .layer(logging::middleware::request_id_layer())
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        // Global 2 MB request body cap
        .layer(RequestBodyLimitLayer::new(2 * 1024 * 1024))
        .layer(cors)
}

/// Pick the store: Postgres when a URL is configured, memory otherwise.
async fn build_store(config: &ServerConfig) -> anyhow::Result<AppState> {
    match &config.database_url {
        Some(url) => {
            let db_config = db::DbConfig {
                url: url.clone(),
                ..db::DbConfig::default()
            };
            let pool = db::init_pool(Some(db_config))
                .await
                .context("failed to connect to the database")?;
            db::run_migrations(&pool)
                .await
                .context("failed to run database migrations")?;
            Ok(AppState::new(PgStore::new(pool)))
        }
        None => {
            tracing::warn!("DATABASE_URL not set. Using the in-memory store; data will not persist.");
            Ok(AppState::new(MemoryStore::new()))
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        return;
    }
    tracing::info!("Shutdown signal received");
}

/// Run the server (used by main).
pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Dropping the guards stops the background log writers.
    let _log_guards = logging::init(&logging::LogConfig::from_env());

    routes::health::init_start_time();

    let config = ServerConfig::from_env();
    let state = build_store(&config).await?;
    let app = create_app(state);
    tracing::info!("CORS configured");

    let addr = config
        .socket_addr()
        .context("invalid HOST/PORT configuration")?;
    tracing::info!(environment = %config.environment, "Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind to {addr}"))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}
