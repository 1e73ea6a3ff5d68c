//! WEFE Living-Lab Dashboard - Backend Server
//!
//! Serves the living-lab catalog and runs scenario sessions: crop and source
//! mix selection, strategy previews, applied strategies and their aggregate
//! impact.

use anyhow::Context;
use axum::{routing::get, Router};
use std::{collections::HashMap, net::SocketAddr, sync::Arc};
use tokio::sync::RwLock;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod error;
mod handlers;
mod routes;
mod services;

pub use config::Config;
use services::{DataStore, SessionStore};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub data: Arc<DataStore>,
    pub sessions: SessionStore,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(data: DataStore, config: Config) -> Self {
        Self {
            data: Arc::new(data),
            sessions: Arc::new(RwLock::new(HashMap::new())),
            config: Arc::new(config),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::load().context("Failed to load configuration")?;

    // Initialize tracing
    let json = config.logging.json;
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wefe_server=debug,tower_http=debug".into()),
        )
        .with(json.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json).then(tracing_subscriber::fmt::layer))
        .init();

    tracing::info!("Starting WEFE Dashboard Server");
    tracing::info!("Environment: {}", config.environment);

    // Load static data
    tracing::info!("Loading data from {}", config.data.dir);
    let data = DataStore::load(&config.data)?;

    // Create application state
    let host: std::net::IpAddr = config.server.host.parse()?;
    let addr = SocketAddr::from((host, config.server.port));
    let state = AppState::new(data, config);

    // Build application
    let app = create_app(state);

    // Start server
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes and middleware
fn create_app(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/health", get(handlers::health_check))
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors)
        .with_state(state)
}

/// Root endpoint
async fn root() -> &'static str {
    "WEFE Living-Lab Dashboard API v1"
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{Method, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;
    use wefe_shared::{CropCatalog, LivingLab, StrategyCatalog};

    use crate::services::LabData;

    fn test_app() -> Router {
        let lab = LivingLab::from_json_str(
            r#"{"name": "Ghana Living Lab - Damango", "country": "Ghana", "sites": [
                {"name": "North", "surface_m3": 1000, "land_cover_percent": {"green": 50},
                 "crop_distribution": [{"name": "Maize", "green_share_percent": 20}]},
                {"name": "South", "surface_m3": 2000, "land_cover_percent": {"green": 25}}
            ]}"#,
        )
        .unwrap();
        let mut lab = LabData::new(lab);
        lab.consumption.insert("Maize", 500.0);
        let crops = CropCatalog::from_json_str(
            r#"{"food": [{"name": "Maize", "space_m2_per_seed": 0.25,
                          "average_yield_g_per_week": 200, "yield_period_days": 70}]}"#,
        )
        .unwrap();
        let strategies = StrategyCatalog::from_json_str(
            r#"{"strategies": [{"key": "agroforestry", "name": "Agroforestry",
                                "affected_land_types": ["green"], "cost_per_sqm_usd": 2}]}"#,
        )
        .unwrap();
        let data = DataStore::from_parts(vec![lab], crops, strategies, None);
        create_app(AppState::new(data, Config::default()))
    }

    async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => request
                .header("content-type", "application/json")
                .body(Body::from(body.to_string())),
            None => request.body(Body::empty()),
        }
        .unwrap();

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    #[tokio::test]
    async fn test_health_counts_records() {
        let app = test_app();
        let (status, body) = call(&app, Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["sites"], 2);
        assert_eq!(body["strategies"], 1);
    }

    #[tokio::test]
    async fn test_unknown_lab_is_404() {
        let app = test_app();
        let (status, body) = call(&app, Method::GET, "/api/v1/labs/Tunisia", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_session_workflow() {
        let app = test_app();

        let (status, session) =
            call(&app, Method::POST, "/api/v1/sessions", Some(json!({ "crops": ["Maize"] }))).await;
        assert_eq!(status, StatusCode::CREATED);
        let id = session["id"].as_str().unwrap().to_string();
        let base = format!("/api/v1/sessions/{}", id);

        let (status, draft) = call(
            &app,
            Method::PUT,
            &format!("{}/draft", base),
            Some(json!({ "scope": "North", "assumptions": { "productivity_increase_percent": 20 } })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(draft["draft"]["scope"], "North");

        let (status, preview) = call(&app, Method::GET, &format!("{}/preview", base), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(preview["impact"]["affected_m2"], 500.0);
        assert_eq!(preview["impact"]["total_cost_usd"], 1000.0);

        let (status, applied) = call(&app, Method::POST, &format!("{}/applications", base), None).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(applied["draft"]["scope"], "ALL");
        assert_eq!(applied["state"]["state"], "applied");

        let (status, summary) = call(&app, Method::GET, &format!("{}/summary", base), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(summary["applications"].as_array().unwrap().len(), 1);
        let multiplier = summary["effective_multiplier"].as_f64().unwrap();
        assert!((multiplier - 1.2).abs() < 1e-12);

        let (status, body) =
            call(&app, Method::DELETE, &format!("{}/applications/3", base), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "APPLICATION_NOT_FOUND");

        let (status, _) = call(&app, Method::DELETE, &format!("{}/applications/0", base), None).await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = call(&app, Method::DELETE, &base, None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = call(&app, Method::GET, &base, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_sources_and_bad_scope() {
        let app = test_app();
        let (_, session) = call(&app, Method::POST, "/api/v1/sessions", Some(json!({}))).await;
        let base = format!("/api/v1/sessions/{}", session["id"].as_str().unwrap());

        let (status, sources) = call(
            &app,
            Method::PUT,
            &format!("{}/sources", base),
            Some(json!({ "water": { "groundwater": 60, "surface_water": 20 },
                         "energy": { "solar": 100 } })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(sources["warnings"][0]["kind"], "incomplete");
        assert_eq!(sources["warnings"][0]["message"], "Water shares total 80%. Adjust to 100%.");

        let (status, body) = call(
            &app,
            Method::PUT,
            &format!("{}/sources", base),
            Some(json!({ "water": { "groundwater": 140 } })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["field"], "water");

        let (status, body) = call(
            &app,
            Method::PUT,
            &format!("{}/draft", base),
            Some(json!({ "scope": "Atlantis" })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "SCOPE_MISMATCH");
    }
}
