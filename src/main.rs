//! Kisan+ Local Activity Store
//!
//! Loopback backend for the Kisan+ farmer assistant: durable profile and history records,
//! the crop diagnosis flow, and the market and scheme catalogs.

mod api;
mod auth;
mod catalog;
mod config;
mod db;
mod diagnosis;
mod errors;
mod models;
mod store;

use std::sync::Arc;

use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::Config;
use db::{KvStore, MemoryKvStore, SqliteKvStore};
use diagnosis::{CannedAnalyzer, DiagnosisFlow};
use store::ActivityStore;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: ActivityStore,
    pub diagnosis: Arc<DiagnosisFlow>,
}

impl AppState {
    /// Wire the stores and the diagnosis flow over one key-value backend.
    pub fn new(kv: Arc<dyn KvStore>, config: &Config) -> Self {
        let store = ActivityStore::new(kv);
        let analyzer = Arc::new(CannedAnalyzer::new(config.analysis_delay));
        let diagnosis = Arc::new(DiagnosisFlow::new(analyzer, store.history.clone()));

        Self { store, diagnosis }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Kisan+ local store");
    tracing::info!("Database path: {:?}", config.db_path);
    tracing::info!("Bind address: {}", config.bind_addr);
    tracing::info!("Simulated analysis delay: {:?}", config.analysis_delay);

    // Initialize the key-value backend
    let kv: Arc<dyn KvStore> = if config.ephemeral {
        tracing::warn!("Ephemeral mode: nothing will survive a restart");
        Arc::new(MemoryKvStore::new())
    } else {
        let pool = db::init_database(&config.db_path).await?;
        tracing::info!("Store schema version {}", db::schema_version(&pool).await?);
        Arc::new(SqliteKvStore::new(pool))
    };

    let state = AppState::new(kv, &config);
    if !state.store.profile.has_profile().await {
        tracing::info!("No profile stored yet; protected routes require onboarding");
    }

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Routes behind the onboarding gate
    let protected_routes = Router::new()
        // History
        .route("/history", get(api::list_history))
        .route("/history", post(api::create_history_entry))
        .route("/history", delete(api::clear_history))
        // Diagnosis
        .route("/diagnosis/crops", get(api::list_diagnosis_crops))
        .route("/diagnosis/sessions", post(api::open_session))
        .route("/diagnosis/sessions/{id}", get(api::get_session))
        .route("/diagnosis/sessions/{id}", delete(api::close_session))
        .route("/diagnosis/sessions/{id}/crop", put(api::select_crop))
        .route("/diagnosis/sessions/{id}/image", put(api::select_image))
        .route("/diagnosis/sessions/{id}/image", delete(api::clear_image))
        .route("/diagnosis/sessions/{id}/analyze", post(api::analyze))
        // Market
        .route("/market", get(api::list_market))
        .route("/market/alerts", get(api::list_price_alerts))
        .route("/market/outlook/{crop}", get(api::get_market_outlook))
        // Schemes
        .route("/schemes", get(api::list_schemes))
        .route("/schemes/categories", get(api::list_scheme_categories))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::onboarding_gate,
        ));

    // Onboarding and logout are reachable without a profile
    let open_routes = Router::new()
        .route("/profile", get(api::get_profile))
        .route("/profile", put(api::save_profile))
        .route("/logout", post(api::logout));

    // Health check
    let health_routes = Router::new().route("/health", get(health_check));

    Router::new()
        .nest("/api", protected_routes.merge(open_routes))
        .merge(health_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}
