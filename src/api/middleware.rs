use std::sync::Arc;

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};

use crate::auth::{AuthService, Claims};
use crate::state::AppState;
use crate::WeatherWiseError;

pub const NO_TOKEN: &str = "Access denied. No token provided.";

/// Extractor that requires a valid bearer token and yields its claims.
///
/// A missing token is rejected with 401, a bad or expired one with 400.
#[derive(Debug)]
pub struct AuthUser(pub Claims);

impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = WeatherWiseError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let auth = auth_service(state)?;

        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| WeatherWiseError::unauthorized(NO_TOKEN))?;

        auth.verify_token(token).map(AuthUser)
    }
}

/// The auth service, or a configuration error when accounts are disabled
pub fn auth_service(state: &AppState) -> crate::Result<&AuthService> {
    state
        .auth
        .as_ref()
        .ok_or_else(|| WeatherWiseError::config("Authentication not configured"))
}
