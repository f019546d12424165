use std::sync::Arc;

use axum::{Json, extract::State, extract::rejection::JsonRejection, http::StatusCode};
use serde::Serialize;

use super::json_body;
use super::middleware::{AuthUser, auth_service};
use crate::Result;
use crate::auth::{AuthSession, LoginRequest, RegisterRequest};
use crate::models::PublicUser;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub message: &'static str,
    #[serde(flatten)]
    pub session: AuthSession,
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub user: PublicUser,
}

/// POST /register
#[tracing::instrument(skip_all)]
pub async fn register(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<AuthResponse>)> {
    let request = json_body(payload)?;
    let session = auth_service(&state)?.register(request).await?;
    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            message: "User registered successfully",
            session,
        }),
    ))
}

/// POST /signin
#[tracing::instrument(skip_all)]
pub async fn signin(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<AuthResponse>> {
    let request = json_body(payload)?;
    let session = auth_service(&state)?.login(request).await?;
    Ok(Json(AuthResponse {
        message: "Login successful",
        session,
    }))
}

/// GET /profile
#[tracing::instrument(skip_all)]
pub async fn profile(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
) -> Result<Json<ProfileResponse>> {
    let user = auth_service(&state)?.profile(&claims.sub).await?;
    Ok(Json(ProfileResponse { user }))
}
