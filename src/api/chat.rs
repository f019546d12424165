use std::sync::Arc;

use axum::{Json, extract::State, extract::rejection::JsonRejection};
use serde::{Deserialize, Serialize};

use super::json_body;
use crate::chat::ChatReply;
use crate::chat::assistant::NO_ANSWER;
use crate::state::AppState;
use crate::{Result, WeatherWiseError};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct MessageRequest {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct GeminiReply {
    pub reply: String,
}

/// POST /api/gemini -- raw pass-through to the text model
#[tracing::instrument(skip_all)]
pub async fn post_gemini(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<MessageRequest>, JsonRejection>,
) -> Result<Json<GeminiReply>> {
    let request = json_body(payload)?;
    let gemini = state
        .gemini
        .as_ref()
        .ok_or_else(|| WeatherWiseError::config("Gemini API key not configured"))?;

    let reply = gemini
        .generate(&request.message)
        .await?
        .unwrap_or_else(|| NO_ANSWER.to_string());
    Ok(Json(GeminiReply { reply }))
}

/// POST /api/chat
#[tracing::instrument(skip_all)]
pub async fn post_chat(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<MessageRequest>, JsonRejection>,
) -> Result<Json<ChatReply>> {
    let request = json_body(payload)?;
    let reply = state.assistant.reply(&request.message).await?;
    Ok(Json(reply))
}
