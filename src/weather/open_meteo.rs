//! Open-Meteo geocoding and forecast client
//!
//! Both APIs are key-free. Every call re-resolves coordinates and
//! re-fetches the forecast; nothing is cached.

use std::time::Instant;

use serde::Deserialize;
use tracing::{debug, info, instrument, warn};

use crate::config::WeatherConfig;
use crate::models::{
    ConditionUnits, CurrentConditions, DailyForecast, DailyOutlook, ForecastBundle,
    HourlyForecast, Location,
};
use crate::upstream::{self, UpstreamClient};
use crate::{Result, WeatherWiseError};

const SERVICE: &str = "Open-Meteo";

const HOURLY_VARIABLES: &str = "temperature_2m,precipitation,wind_speed_10m";
const DAILY_VARIABLES: &str = "temperature_2m_max,temperature_2m_min,precipitation_sum";
const CURRENT_VARIABLES: &str = "temperature_2m,relative_humidity_2m,wind_speed_10m,weather_code";
const OUTLOOK_VARIABLES: &str = "weather_code,temperature_2m_max,temperature_2m_min";

/// Client for the Open-Meteo geocoding and forecast APIs
#[derive(Clone)]
pub struct OpenMeteoClient {
    client: UpstreamClient,
    geocoding_base_url: String,
    forecast_base_url: String,
}

impl OpenMeteoClient {
    /// Create a new client
    pub fn new(client: UpstreamClient, config: &WeatherConfig) -> Self {
        Self {
            client,
            geocoding_base_url: config.geocoding_base_url.trim_end_matches('/').to_string(),
            forecast_base_url: config.forecast_base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Resolve a free-text place name to its top-1 geocoding match
    #[instrument(skip(self))]
    pub async fn geocode(&self, name: &str) -> Result<Location> {
        let start_time = Instant::now();
        let url = format!(
            "{}/search?name={}&count=1&language=en&format=json",
            self.geocoding_base_url,
            urlencoding::encode(name)
        );
        debug!("Geocoding request URL: {}", url);

        let response: GeocodingResponse = upstream::send_json(SERVICE, self.client.get(url)).await?;

        let Some(result) = response.results.unwrap_or_default().into_iter().next() else {
            warn!("No geocoding results for '{}'", name);
            return Err(WeatherWiseError::not_found("City not found."));
        };

        let location = Location::new(result.name, result.latitude, result.longitude, result.timezone)
            .with_country(result.country);
        info!(
            "Geocoded '{}' to {} ({}) in {:.3}s",
            name,
            location.name,
            location.format_coordinates(),
            start_time.elapsed().as_secs_f64()
        );
        Ok(location)
    }

    /// Fetch the daily and hourly forecast for a resolved location
    #[instrument(skip(self, location), fields(city = %location.name))]
    pub async fn forecast(&self, location: &Location) -> Result<ForecastBundle> {
        let url = format!(
            "{}/forecast?latitude={}&longitude={}&hourly={}&daily={}&timezone={}",
            self.forecast_base_url,
            location.latitude,
            location.longitude,
            HOURLY_VARIABLES,
            DAILY_VARIABLES,
            urlencoding::encode(&location.timezone)
        );

        let response: ForecastResponse = upstream::send_json(SERVICE, self.client.get(url)).await?;
        let bundle = response.into_bundle(location);

        if !bundle.daily.is_aligned() || !bundle.hourly.is_aligned() {
            warn!("Forecast series for {} have mismatched lengths", location.name);
        }
        info!(
            "Retrieved forecast for {}: {} days, {} hours",
            location.name,
            bundle.daily.len(),
            bundle.hourly.len()
        );
        Ok(bundle)
    }

    /// Geocode a city and fetch its forecast
    pub async fn forecast_for_city(&self, city: &str) -> Result<ForecastBundle> {
        let city = city.trim();
        if city.is_empty() {
            return Err(WeatherWiseError::validation("City is required"));
        }
        let location = self.geocode(city).await?;
        self.forecast(&location).await
    }

    /// Fetch current conditions and a two-day outlook for a location
    #[instrument(skip(self, location), fields(city = %location.name))]
    pub async fn current_conditions(&self, location: &Location) -> Result<CurrentConditions> {
        let url = format!(
            "{}/forecast?latitude={}&longitude={}&current={}&daily={}&timezone=auto&forecast_days=2",
            self.forecast_base_url,
            location.latitude,
            location.longitude,
            CURRENT_VARIABLES,
            OUTLOOK_VARIABLES
        );

        let response: ForecastResponse = upstream::send_json(SERVICE, self.client.get(url)).await?;
        response.into_conditions(location.clone())
    }
}

/// Geocoding response from Open-Meteo
#[derive(Debug, Deserialize)]
struct GeocodingResponse {
    results: Option<Vec<GeocodingResult>>,
}

#[derive(Debug, Deserialize)]
struct GeocodingResult {
    name: String,
    latitude: f64,
    longitude: f64,
    country: Option<String>,
    timezone: Option<String>,
}

/// Forecast response from Open-Meteo; every block is optional and only
/// present when requested
#[derive(Debug, Deserialize)]
struct ForecastResponse {
    timezone: Option<String>,
    hourly: Option<HourlyData>,
    daily: Option<DailyData>,
    current: Option<CurrentData>,
    current_units: Option<CurrentUnits>,
}

#[derive(Debug, Deserialize)]
struct HourlyData {
    #[serde(default)]
    time: Vec<String>,
    temperature_2m: Option<Vec<Option<f64>>>,
    precipitation: Option<Vec<Option<f64>>>,
    wind_speed_10m: Option<Vec<Option<f64>>>,
}

#[derive(Debug, Deserialize)]
struct DailyData {
    #[serde(default)]
    time: Vec<String>,
    temperature_2m_max: Option<Vec<Option<f64>>>,
    temperature_2m_min: Option<Vec<Option<f64>>>,
    precipitation_sum: Option<Vec<Option<f64>>>,
    weather_code: Option<Vec<Option<u8>>>,
}

#[derive(Debug, Deserialize)]
struct CurrentData {
    temperature_2m: f64,
    relative_humidity_2m: f64,
    wind_speed_10m: f64,
    weather_code: u8,
}

#[derive(Debug, Deserialize)]
struct CurrentUnits {
    temperature_2m: Option<String>,
    relative_humidity_2m: Option<String>,
    wind_speed_10m: Option<String>,
}

impl ForecastResponse {
    fn into_bundle(self, location: &Location) -> ForecastBundle {
        let daily = self
            .daily
            .map(|d| DailyForecast {
                time: d.time,
                temperature_max: d.temperature_2m_max.unwrap_or_default(),
                temperature_min: d.temperature_2m_min.unwrap_or_default(),
                precipitation_sum: d.precipitation_sum.unwrap_or_default(),
            })
            .unwrap_or_default();

        let hourly = self
            .hourly
            .map(|h| HourlyForecast {
                time: h.time,
                temperature: h.temperature_2m.unwrap_or_default(),
                precipitation: h.precipitation.unwrap_or_default(),
                wind_speed: h.wind_speed_10m.unwrap_or_default(),
            })
            .unwrap_or_default();

        ForecastBundle {
            city: location.name.clone(),
            timezone: self.timezone.unwrap_or_else(|| location.timezone.clone()),
            daily,
            hourly,
        }
    }

    fn into_conditions(self, location: Location) -> Result<CurrentConditions> {
        let current = self.current.ok_or_else(|| {
            WeatherWiseError::upstream(SERVICE, "No current weather data available from Open-Meteo")
        })?;

        let defaults = ConditionUnits::default();
        let units = match self.current_units {
            Some(u) => ConditionUnits {
                temperature: u.temperature_2m.unwrap_or(defaults.temperature),
                humidity: u.relative_humidity_2m.unwrap_or(defaults.humidity),
                wind_speed: u.wind_speed_10m.unwrap_or(defaults.wind_speed),
            },
            None => defaults,
        };

        let outlook = match self.daily {
            Some(daily) => (0..daily.time.len())
                .map(|i| DailyOutlook {
                    weather_code: pick(&daily.weather_code, i),
                    temperature_max: pick(&daily.temperature_2m_max, i),
                    temperature_min: pick(&daily.temperature_2m_min, i),
                })
                .collect(),
            None => Vec::new(),
        };

        Ok(CurrentConditions {
            location,
            temperature: current.temperature_2m,
            humidity: current.relative_humidity_2m,
            wind_speed: current.wind_speed_10m,
            weather_code: current.weather_code,
            units,
            outlook,
        })
    }
}

fn pick<T: Copy>(series: &Option<Vec<Option<T>>>, index: usize) -> Option<T> {
    series.as_ref().and_then(|values| values.get(index).copied().flatten())
}
