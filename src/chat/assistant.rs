//! Chat replies: weather questions answered from Open-Meteo, everything
//! else forwarded to Gemini. Upstream failures become fixed apology texts;
//! only an empty message is an error.

use serde::Serialize;
use tracing::{info, warn};

use super::gemini::GeminiClient;
use super::intent::{self, Intent};
use crate::models::{CurrentConditions, DailyOutlook};
use crate::weather::{OpenMeteoClient, describe_weather_code};
use crate::{Result, WeatherWiseError};

pub const CLARIFY_LOCATION: &str = "I'd be happy to provide weather information. Could you please specify a location? For example, 'What's the weather in Delhi?'";
pub const WEATHER_UNAVAILABLE: &str =
    "I'm having trouble retrieving the weather data right now. Please try again later.";
pub const NO_ANSWER: &str = "Sorry, I couldn't find an answer.";
pub const TECHNICAL_DIFFICULTIES: &str =
    "I'm experiencing technical difficulties. Please try again shortly.";

/// Assistant reply plus the intent it was derived from
#[derive(Debug, Clone, Serialize)]
pub struct ChatReply {
    pub reply: String,
    pub intent: Intent,
}

#[derive(Clone)]
pub struct ChatAssistant {
    weather: OpenMeteoClient,
    gemini: Option<GeminiClient>,
}

impl ChatAssistant {
    pub fn new(weather: OpenMeteoClient, gemini: Option<GeminiClient>) -> Self {
        Self { weather, gemini }
    }

    /// Answer one chat message
    pub async fn reply(&self, message: &str) -> Result<ChatReply> {
        let message = message.trim();
        if message.is_empty() {
            return Err(WeatherWiseError::validation("Message is required"));
        }

        let intent = intent::classify(message);
        info!("Chat message classified as {:?}", intent);

        let reply = match &intent {
            Intent::WeatherAt(location) => self.weather_reply(location).await,
            Intent::WeatherWithoutLocation => CLARIFY_LOCATION.to_string(),
            Intent::General => self.general_reply(message).await,
        };

        Ok(ChatReply { reply, intent })
    }

    async fn weather_reply(&self, location: &str) -> String {
        let resolved = match self.weather.geocode(location).await {
            Ok(resolved) => resolved,
            Err(WeatherWiseError::NotFound { .. }) => return location_not_found(location),
            Err(e) => {
                warn!("Geocoding for chat failed: {}", e);
                return WEATHER_UNAVAILABLE.to_string();
            }
        };

        match self.weather.current_conditions(&resolved).await {
            Ok(conditions) => format_conditions(&conditions),
            Err(e) => {
                warn!("Current conditions for chat failed: {}", e);
                WEATHER_UNAVAILABLE.to_string()
            }
        }
    }

    async fn general_reply(&self, message: &str) -> String {
        let Some(gemini) = &self.gemini else {
            warn!("Gemini is not configured, cannot answer general question");
            return TECHNICAL_DIFFICULTIES.to_string();
        };

        match gemini.generate(message).await {
            Ok(Some(text)) => text,
            Ok(None) => NO_ANSWER.to_string(),
            Err(e) => {
                warn!("Gemini request failed: {}", e);
                TECHNICAL_DIFFICULTIES.to_string()
            }
        }
    }
}

fn location_not_found(location: &str) -> String {
    format!(
        "I couldn't find the location \"{location}\". Could you please check the spelling or try another location?"
    )
}

/// Multi-line summary of current conditions and the two-day outlook
#[must_use]
pub fn format_conditions(conditions: &CurrentConditions) -> String {
    let mut lines = vec![
        format!("Current weather in {}:", conditions.location.display_name()),
        format!("Temperature: {}", conditions.format_temperature()),
        format!("Conditions: {}", describe_weather_code(conditions.weather_code)),
        format!("Humidity: {}", conditions.format_humidity()),
        format!("Wind Speed: {}", conditions.format_wind()),
        String::new(),
    ];
    lines.push(format!("Today: {}", format_outlook(conditions.today())));
    lines.push(format!("Tomorrow: {}", format_outlook(conditions.tomorrow())));
    lines.join("\n")
}

fn format_outlook(day: Option<&DailyOutlook>) -> String {
    let Some(day) = day else {
        return "Unknown".to_string();
    };
    let description = day.weather_code.map_or("Unknown", describe_weather_code);
    format!(
        "{}, high of {}°C, low of {}°C",
        description,
        format_degrees(day.temperature_max),
        format_degrees(day.temperature_min)
    )
}

fn format_degrees(value: Option<f64>) -> String {
    value.map_or_else(|| "N/A".to_string(), |v| v.to_string())
}
