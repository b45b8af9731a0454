use axum::{
    extract::State,
    http::StatusCode,
    middleware,
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    middleware::{make_span_with_request_id, request_id_middleware},
    models::Envelope,
    state::AppState,
};

pub mod analytics;
pub mod auth;
pub mod content;

/// Creates the application router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .nest("/api", api_routes())
        .fallback(not_found)
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
                .layer(CorsLayer::permissive()),
        )
}

/// API routes under /api
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health_check))
        .route("/status", get(api_status))
        // Auth
        .route("/auth/signup", post(auth::signup))
        .route("/auth/signin", post(auth::signin))
        .route("/auth/profile", get(auth::profile))
        // Content
        .route("/content", post(content::create))
        .route("/content/trending", get(content::trending))
        .route("/content/search", get(content::search))
        .route("/content/recommendations", get(content::recommendations))
        .route("/content/category/:category", get(content::by_category))
        .route("/content/:id", get(content::view).put(content::update))
        .route("/content/:id/analyze", post(content::analyze))
        .route("/content/:id/like", post(content::like))
        // Analytics
        .route("/analytics/stats", get(analytics::platform_stats))
        .route("/analytics/content-stats", get(analytics::content_stats))
}

/// Liveness report returned by `/api/health`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthStatus {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    /// Seconds since the server started
    pub uptime: u64,
}

/// Service description returned by `/api/status`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiStatus {
    pub message: String,
    pub version: String,
    pub timestamp: DateTime<Utc>,
}

/// Health check endpoint
async fn health_check(State(state): State<Arc<AppState>>) -> Json<Envelope<HealthStatus>> {
    Json(Envelope::ok(HealthStatus {
        status: "ok".to_string(),
        timestamp: Utc::now(),
        uptime: state.started_at.elapsed().as_secs(),
    }))
}

/// API status endpoint
async fn api_status() -> Json<Envelope<ApiStatus>> {
    Json(Envelope::ok(ApiStatus {
        message: "API is running".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now(),
    }))
}

async fn not_found() -> (StatusCode, Json<Value>) {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "Not found" })))
}
