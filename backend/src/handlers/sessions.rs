//! Scenario session HTTP handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::services::scenario::{
    CreateSessionInput, ScenarioService, UpdateCropsInput, UpdateDraftInput, UpdateSourcesInput,
};
use crate::AppState;

fn scenario_service(state: &AppState) -> ScenarioService {
    ScenarioService::new(
        state.data.clone(),
        state.sessions.clone(),
        state.config.assumptions.to_assumptions(),
        state.config.sessions,
    )
}

/// Start a new session
pub async fn create_session(
    State(state): State<AppState>,
    Json(input): Json<CreateSessionInput>,
) -> impl IntoResponse {
    let service = scenario_service(&state);

    match service.create_session(input).await {
        Ok(session) => (StatusCode::CREATED, Json(session)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Get a session snapshot
pub async fn get_session(State(state): State<AppState>, Path(id): Path<Uuid>) -> impl IntoResponse {
    let service = scenario_service(&state);

    match service.get_session(id).await {
        Ok(session) => (StatusCode::OK, Json(session)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// End a session
pub async fn delete_session(State(state): State<AppState>, Path(id): Path<Uuid>) -> impl IntoResponse {
    let service = scenario_service(&state);

    match service.delete_session(id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => e.into_response(),
    }
}

/// Enable or disable crops
pub async fn update_crops(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateCropsInput>,
) -> impl IntoResponse {
    let service = scenario_service(&state);

    match service.set_crops(id, input).await {
        Ok(selection) => (StatusCode::OK, Json(selection)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Set the water and energy source mixes
pub async fn update_sources(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateSourcesInput>,
) -> impl IntoResponse {
    let service = scenario_service(&state);

    match service.set_sources(id, input).await {
        Ok(sources) => (StatusCode::OK, Json(sources)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Select the strategy, scope and assumptions of the draft
pub async fn update_draft(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateDraftInput>,
) -> impl IntoResponse {
    let service = scenario_service(&state);

    match service.update_draft(id, input).await {
        Ok(draft) => (StatusCode::OK, Json(draft)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Preview the draft's impact and production
pub async fn preview(State(state): State<AppState>, Path(id): Path<Uuid>) -> impl IntoResponse {
    let service = scenario_service(&state);

    match service.preview(id).await {
        Ok(preview) => (StatusCode::OK, Json(preview)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Apply the draft
pub async fn apply_strategy(State(state): State<AppState>, Path(id): Path<Uuid>) -> impl IntoResponse {
    let service = scenario_service(&state);

    match service.apply(id).await {
        Ok(applied) => (StatusCode::CREATED, Json(applied)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Remove an applied strategy by position
pub async fn remove_application(
    State(state): State<AppState>,
    Path((id, index)): Path<(Uuid, usize)>,
) -> impl IntoResponse {
    let service = scenario_service(&state);

    match service.remove_application(id, index).await {
        Ok(removed) => (StatusCode::OK, Json(removed)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Aggregate impacts and compounded production
pub async fn summary(State(state): State<AppState>, Path(id): Path<Uuid>) -> impl IntoResponse {
    let service = scenario_service(&state);

    match service.summary(id).await {
        Ok(summary) => (StatusCode::OK, Json(summary)).into_response(),
        Err(e) => e.into_response(),
    }
}
