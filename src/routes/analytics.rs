use axum::{extract::State, Json};
use std::sync::Arc;

use crate::{
    error::AppResult,
    models::{ContentStats, Envelope, PlatformStats},
    services::analytics,
    state::AppState,
};

pub async fn platform_stats(
    State(state): State<Arc<AppState>>,
) -> AppResult<Json<Envelope<PlatformStats>>> {
    Ok(Json(Envelope::ok(analytics::platform_stats(&state).await?)))
}

pub async fn content_stats(
    State(state): State<Arc<AppState>>,
) -> AppResult<Json<Envelope<ContentStats>>> {
    Ok(Json(Envelope::ok(analytics::content_stats(&state).await?)))
}
