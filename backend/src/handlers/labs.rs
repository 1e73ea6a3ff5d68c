//! Living lab HTTP handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::services::CatalogService;
use crate::AppState;

/// List all living labs
pub async fn list_labs(State(state): State<AppState>) -> impl IntoResponse {
    let service = CatalogService::new(state.data.clone());

    (StatusCode::OK, Json(serde_json::json!({ "labs": service.list_labs() })))
}

/// Get a lab with its land-use share table
pub async fn get_lab(State(state): State<AppState>, Path(name): Path<String>) -> impl IntoResponse {
    let service = CatalogService::new(state.data.clone());

    match service.get_lab(&name) {
        Ok(lab) => (StatusCode::OK, Json(lab)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Get the map framing of a lab's sites
pub async fn get_lab_map(State(state): State<AppState>, Path(name): Path<String>) -> impl IntoResponse {
    let service = CatalogService::new(state.data.clone());

    match service.lab_map(&name) {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(e) => e.into_response(),
    }
}
