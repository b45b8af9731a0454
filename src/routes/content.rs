use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    error::AppResult,
    middleware::AuthUser,
    models::{
        ContentAnalysis, ContentItem, ContentUpdate, LikeResponse, NewContent, ScoredItem,
        SearchPage, SearchQuery,
    },
    services::content,
    state::AppState,
};

#[derive(Debug, Default, Deserialize)]
pub struct LimitQuery {
    limit: Option<u32>,
}

pub async fn trending(
    State(state): State<Arc<AppState>>,
    Query(params): Query<LimitQuery>,
) -> AppResult<Json<Vec<ContentItem>>> {
    Ok(Json(content::trending(&state, params.limit).await?))
}

pub async fn search(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SearchQuery>,
) -> AppResult<Json<SearchPage>> {
    Ok(Json(content::search(&state, query).await?))
}

pub async fn recommendations(
    State(state): State<Arc<AppState>>,
    caller: Option<AuthUser>,
    Query(params): Query<LimitQuery>,
) -> AppResult<Json<Vec<ScoredItem>>> {
    let claims = caller.map(|AuthUser(claims)| claims);
    let ranked = content::recommendations(&state, claims.as_ref(), params.limit).await?;
    Ok(Json(ranked))
}

pub async fn by_category(
    State(state): State<Arc<AppState>>,
    Path(category): Path<String>,
    Query(params): Query<LimitQuery>,
) -> AppResult<Json<Vec<ContentItem>>> {
    Ok(Json(
        content::by_category(&state, &category, params.limit).await?,
    ))
}

pub async fn view(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ContentItem>> {
    Ok(Json(content::view(&state, id).await?))
}

pub async fn analyze(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ContentAnalysis>> {
    tracing::debug!(user_id = %claims.sub, content_id = %id, "Analysis requested");
    Ok(Json(content::analyze(&state, id).await?))
}

pub async fn like(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<LikeResponse>> {
    Ok(Json(content::like(&state, id).await?))
}

pub async fn create(
    State(state): State<Arc<AppState>>,
    AuthUser(_): AuthUser,
    Json(new): Json<NewContent>,
) -> AppResult<(StatusCode, Json<ContentItem>)> {
    let item = content::create(&state, new).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

pub async fn update(
    State(state): State<Arc<AppState>>,
    AuthUser(_): AuthUser,
    Path(id): Path<Uuid>,
    Json(update): Json<ContentUpdate>,
) -> AppResult<Json<ContentItem>> {
    Ok(Json(content::update(&state, id, update).await?))
}
