//! Forecast bundle returned by the weather endpoint
//!
//! Field names on the wire follow Open-Meteo's variable names so the
//! frontend can read `daily.temperature_2m_max` and friends directly.

use serde::{Deserialize, Serialize};

/// Forecast for one city: daily and hourly series, parallel-indexed by `time`
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ForecastBundle {
    /// City name as resolved by the geocoder
    pub city: String,
    /// Timezone the series are expressed in
    pub timezone: String,
    pub daily: DailyForecast,
    pub hourly: HourlyForecast,
}

/// Daily series
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct DailyForecast {
    /// ISO dates
    pub time: Vec<String>,
    /// Maximum temperature in °C
    #[serde(rename = "temperature_2m_max")]
    pub temperature_max: Vec<Option<f64>>,
    /// Minimum temperature in °C
    #[serde(rename = "temperature_2m_min")]
    pub temperature_min: Vec<Option<f64>>,
    /// Precipitation sum in mm
    pub precipitation_sum: Vec<Option<f64>>,
}

/// Hourly series
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct HourlyForecast {
    /// ISO local timestamps
    pub time: Vec<String>,
    /// Temperature in °C
    #[serde(rename = "temperature_2m")]
    pub temperature: Vec<Option<f64>>,
    /// Precipitation in mm
    pub precipitation: Vec<Option<f64>>,
    /// Wind speed in km/h
    #[serde(rename = "wind_speed_10m")]
    pub wind_speed: Vec<Option<f64>>,
}

impl DailyForecast {
    /// Number of days
    #[must_use]
    pub fn len(&self) -> usize {
        self.time.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// Every series has one value per day
    #[must_use]
    pub fn is_aligned(&self) -> bool {
        let n = self.time.len();
        self.temperature_max.len() == n
            && self.temperature_min.len() == n
            && self.precipitation_sum.len() == n
    }
}

impl HourlyForecast {
    /// Number of hours
    #[must_use]
    pub fn len(&self) -> usize {
        self.time.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// Every series has one value per hour
    #[must_use]
    pub fn is_aligned(&self) -> bool {
        let n = self.time.len();
        self.temperature.len() == n && self.precipitation.len() == n && self.wind_speed.len() == n
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_upstream_field_names() {
        let bundle = ForecastBundle {
            city: "Tokyo".to_string(),
            timezone: "Asia/Tokyo".to_string(),
            daily: DailyForecast {
                time: vec!["2025-01-01".to_string()],
                temperature_max: vec![Some(9.5)],
                temperature_min: vec![Some(1.0)],
                precipitation_sum: vec![None],
            },
            hourly: HourlyForecast::default(),
        };

        let json = serde_json::to_value(&bundle).unwrap();
        assert_eq!(json["daily"]["temperature_2m_max"][0], 9.5);
        assert!(json["daily"]["precipitation_sum"][0].is_null());
        assert!(json["hourly"]["wind_speed_10m"].is_array());
        assert!(json["hourly"]["temperature_2m"].is_array());
    }

    #[test]
    fn test_alignment() {
        let mut daily = DailyForecast {
            time: vec!["2025-01-01".to_string(), "2025-01-02".to_string()],
            temperature_max: vec![Some(1.0), Some(2.0)],
            temperature_min: vec![Some(0.0), Some(0.5)],
            precipitation_sum: vec![Some(0.0), Some(3.2)],
        };
        assert!(daily.is_aligned());
        assert_eq!(daily.len(), 2);

        daily.precipitation_sum.pop();
        assert!(!daily.is_aligned());
    }
}
