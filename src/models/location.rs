//! Location model for geocoded places

use serde::{Deserialize, Serialize};

/// Timezone passed upstream when geocoding did not report one
pub const AUTO_TIMEZONE: &str = "auto";

/// A geocoded place, resolved per request
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Location {
    /// Place name as reported by the geocoder
    pub name: String,
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
    /// IANA timezone name, or `auto`
    pub timezone: String,
    /// Country name
    pub country: Option<String>,
}

impl Location {
    /// Create a new location
    #[must_use]
    pub fn new(name: String, latitude: f64, longitude: f64, timezone: Option<String>) -> Self {
        Self {
            name,
            latitude,
            longitude,
            timezone: timezone
                .filter(|tz| !tz.is_empty())
                .unwrap_or_else(|| AUTO_TIMEZONE.to_string()),
            country: None,
        }
    }

    /// Attach a country name
    #[must_use]
    pub fn with_country(mut self, country: Option<String>) -> Self {
        self.country = country;
        self
    }

    /// Name followed by the country when known, e.g. "Tokyo, Japan"
    #[must_use]
    pub fn display_name(&self) -> String {
        match &self.country {
            Some(country) if !country.is_empty() => format!("{}, {}", self.name, country),
            _ => self.name.clone(),
        }
    }

    /// Format location as coordinates string
    #[must_use]
    pub fn format_coordinates(&self) -> String {
        format!("{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_timezone_falls_back_to_auto() {
        let location = Location::new("Tokyo".to_string(), 35.6895, 139.6917, None);
        assert_eq!(location.timezone, "auto");

        let location = Location::new("Tokyo".to_string(), 35.6895, 139.6917, Some(String::new()));
        assert_eq!(location.timezone, "auto");
    }

    #[test]
    fn test_display_name() {
        let location = Location::new("Delhi".to_string(), 28.65, 77.23, None)
            .with_country(Some("India".to_string()));
        assert_eq!(location.display_name(), "Delhi, India");

        let location = Location::new("Delhi".to_string(), 28.65, 77.23, None);
        assert_eq!(location.display_name(), "Delhi");
    }

    #[test]
    fn test_format_coordinates() {
        let location = Location::new("Test".to_string(), 46.818_234, 8.227_456, None);
        assert_eq!(location.format_coordinates(), "46.8182, 8.2275");
    }
}
