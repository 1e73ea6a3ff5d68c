//! Health check handlers

use axum::{extract::State, Json};
use serde::Serialize;

use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub labs: usize,
    pub sites: usize,
    pub crops: usize,
    pub strategies: usize,
    pub sessions: usize,
}

/// Health check endpoint handler
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let sessions = state.sessions.read().await.len();

    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        labs: state.data.labs.len(),
        sites: state.data.site_count(),
        crops: state.data.crops.len(),
        strategies: state.data.strategies.len(),
        sessions,
    })
}
