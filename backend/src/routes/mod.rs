//! Route definitions for the WEFE dashboard API

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/labs", lab_routes())
        .route("/crops", get(handlers::list_crops))
        .route("/strategies", get(handlers::list_strategies))
        .nest("/sessions", session_routes())
}

/// Living lab routes
fn lab_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_labs))
        .route("/:name", get(handlers::get_lab))
        .route("/:name/map", get(handlers::get_lab_map))
}

/// Scenario session routes
fn session_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(handlers::create_session))
        .route(
            "/:id",
            get(handlers::get_session).delete(handlers::delete_session),
        )
        .route("/:id/crops", put(handlers::update_crops))
        .route("/:id/sources", put(handlers::update_sources))
        .route("/:id/draft", put(handlers::update_draft))
        .route("/:id/preview", get(handlers::preview))
        .route("/:id/applications", post(handlers::apply_strategy))
        .route("/:id/applications/:index", delete(handlers::remove_application))
        .route("/:id/summary", get(handlers::summary))
}
