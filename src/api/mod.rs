//! HTTP handlers and route tables

pub mod auth;
pub mod chat;
pub mod health;
pub mod middleware;
pub mod news;
pub mod weather;

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::rejection::JsonRejection,
    routing::{get, post},
};

use crate::state::AppState;
use crate::{Result, WeatherWiseError};

/// Routes mounted under `/api`
pub fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/weather", get(weather::get_weather))
        .route("/news", get(news::get_news))
        .route("/gemini", post(chat::post_gemini))
        .route("/chat", post(chat::post_chat))
        .route("/health", get(health::health))
}

/// Account routes mounted at the root
pub fn account_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/signin", post(auth::signin))
        .route("/profile", get(auth::profile))
}

/// Turn a JSON body rejection into the API's error shape
pub(crate) fn json_body<T>(payload: std::result::Result<Json<T>, JsonRejection>) -> Result<T> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| WeatherWiseError::validation(rejection.body_text()))
}
