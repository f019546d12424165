//! Current conditions snapshot used by the chat assistant

use serde::{Deserialize, Serialize};

use super::Location;

/// Current weather plus today's and tomorrow's outlook for one place
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CurrentConditions {
    pub location: Location,
    /// Temperature now
    pub temperature: f64,
    /// Relative humidity now
    pub humidity: f64,
    /// Wind speed now
    pub wind_speed: f64,
    /// WMO weather code now
    pub weather_code: u8,
    pub units: ConditionUnits,
    /// Today first, then tomorrow when available
    pub outlook: Vec<DailyOutlook>,
}

/// Units reported by the upstream for the current values
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ConditionUnits {
    pub temperature: String,
    pub humidity: String,
    pub wind_speed: String,
}

impl Default for ConditionUnits {
    fn default() -> Self {
        Self {
            temperature: "°C".to_string(),
            humidity: "%".to_string(),
            wind_speed: "km/h".to_string(),
        }
    }
}

/// One day of outlook
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct DailyOutlook {
    pub weather_code: Option<u8>,
    pub temperature_max: Option<f64>,
    pub temperature_min: Option<f64>,
}

impl CurrentConditions {
    /// Format temperature with unit
    #[must_use]
    pub fn format_temperature(&self) -> String {
        format!("{}{}", self.temperature, self.units.temperature)
    }

    /// Format humidity with unit
    #[must_use]
    pub fn format_humidity(&self) -> String {
        format!("{}{}", self.humidity, self.units.humidity)
    }

    /// Format wind speed with unit
    #[must_use]
    pub fn format_wind(&self) -> String {
        format!("{}{}", self.wind_speed, self.units.wind_speed)
    }

    #[must_use]
    pub fn today(&self) -> Option<&DailyOutlook> {
        self.outlook.first()
    }

    #[must_use]
    pub fn tomorrow(&self) -> Option<&DailyOutlook> {
        self.outlook.get(1)
    }
}
