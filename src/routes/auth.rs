use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

use crate::{
    error::AppResult,
    middleware::AuthUser,
    models::{AuthResponse, SigninRequest, SignupRequest, UserProfile},
    services::auth,
    state::AppState,
};

pub async fn signup(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SignupRequest>,
) -> AppResult<(StatusCode, Json<AuthResponse>)> {
    let response = auth::signup(state.users.as_ref(), &state.tokens, request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

pub async fn signin(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SigninRequest>,
) -> AppResult<Json<AuthResponse>> {
    let response = auth::signin(state.users.as_ref(), &state.tokens, request).await?;
    Ok(Json(response))
}

pub async fn profile(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
) -> AppResult<Json<UserProfile>> {
    let profile = auth::profile(state.users.as_ref(), claims.sub).await?;
    Ok(Json(profile))
}
