//! Pattern-based classification of chat messages

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

/// Words that mark a message as weather-related
pub const WEATHER_KEYWORDS: [&str; 10] = [
    "weather",
    "temperature",
    "forecast",
    "rain",
    "sunny",
    "humidity",
    "wind",
    "climate",
    "hot",
    "cold",
];

/// Tried in order; the first match wins
const LOCATION_PATTERNS: [&str; 10] = [
    r"weather in ([a-z\s]+)(?:\?|$)",
    r"temperature in ([a-z\s]+)(?:\?|$)",
    r"forecast for ([a-z\s]+)(?:\?|$)",
    r"how is the weather in ([a-z\s]+)(?:\?|$)",
    r"what is the weather in ([a-z\s]+)(?:\?|$)",
    r"what's the weather in ([a-z\s]+)(?:\?|$)",
    r"what is the temperature in ([a-z\s]+)(?:\?|$)",
    r"what's the temperature in ([a-z\s]+)(?:\?|$)",
    r"how hot is it in ([a-z\s]+)(?:\?|$)",
    r"how cold is it in ([a-z\s]+)(?:\?|$)",
];

static LOCATION_REGEXES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    LOCATION_PATTERNS
        .iter()
        .filter_map(|pattern| Regex::new(pattern).ok())
        .collect()
});

/// What a chat message is asking for
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "location", rename_all = "snake_case")]
pub enum Intent {
    /// Weather for a named place
    WeatherAt(String),
    /// Weather question that names no place we can pick out
    WeatherWithoutLocation,
    General,
}

/// True when the lower-cased text contains any weather keyword.
///
/// Plain substring containment, so "photo" counts as "hot".
#[must_use]
pub fn is_weather_query(text: &str) -> bool {
    let lower = text.to_lowercase();
    WEATHER_KEYWORDS.iter().any(|keyword| lower.contains(keyword))
}

/// Pull a place name out of a weather question
#[must_use]
pub fn extract_location(text: &str) -> Option<String> {
    let lower = text.to_lowercase();
    // The first pattern that matches decides, even if its capture is blank.
    LOCATION_REGEXES
        .iter()
        .find_map(|regex| regex.captures(&lower))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|location| !location.is_empty())
}

#[must_use]
pub fn classify(text: &str) -> Intent {
    if !is_weather_query(text) {
        return Intent::General;
    }
    match extract_location(text) {
        Some(location) => Intent::WeatherAt(location),
        None => Intent::WeatherWithoutLocation,
    }
}
