//! Crop and strategy catalog HTTP handlers

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use crate::services::CatalogService;
use crate::AppState;

/// List crops with their info popover lines
pub async fn list_crops(State(state): State<AppState>) -> impl IntoResponse {
    let service = CatalogService::new(state.data.clone());

    (StatusCode::OK, Json(serde_json::json!({ "crops": service.crops() })))
}

/// List agroforestry strategies
pub async fn list_strategies(State(state): State<AppState>) -> impl IntoResponse {
    let service = CatalogService::new(state.data.clone());

    (StatusCode::OK, Json(serde_json::json!({ "strategies": service.strategies() })))
}
