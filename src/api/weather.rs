use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;

use crate::Result;
use crate::models::ForecastBundle;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct WeatherQuery {
    pub city: Option<String>,
}

/// GET /api/weather?city=
#[tracing::instrument(skip(state))]
pub async fn get_weather(
    State(state): State<Arc<AppState>>,
    Query(query): Query<WeatherQuery>,
) -> Result<Json<ForecastBundle>> {
    let city = query.city.unwrap_or_default();
    let bundle = state.weather.forecast_for_city(&city).await?;
    Ok(Json(bundle))
}
