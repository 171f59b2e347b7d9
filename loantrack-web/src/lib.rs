//! loantrack-web library - book loan tracking service
//!
//! Records which user borrowed or returned which book, and registers books
//! by looking up bibliographic metadata from OpenBD.

use axum::Router;
use sqlx::SqlitePool;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod db;
pub mod metadata;

use metadata::OpenBdClient;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Bibliographic metadata lookup client
    pub metadata: OpenBdClient,
}

impl AppState {
    /// Create new application state
    pub fn new(db: SqlitePool, metadata: OpenBdClient) -> Self {
        Self { db, metadata }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{get, post};

    Router::new()
        .route("/", get(api::serve_index))
        .route("/static/app.js", get(api::serve_app_js))
        .route("/api/overview", get(api::overview))
        .route("/api/current_loans", get(api::current_loans))
        .route("/submit", post(api::submit))
        .route("/do/:what", get(api::do_action).post(api::do_action))
        .route("/add_book", post(api::add_book))
        .route("/add_user", post(api::add_user))
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
