//! Configuration management for the `WeatherWise` API
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::WeatherWiseError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure for the `WeatherWise` API
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherWiseConfig {
    /// HTTP server settings
    pub server: ServerConfig,
    /// Shared settings for every third-party call
    pub upstream: UpstreamConfig,
    /// Open-Meteo endpoints
    pub weather: WeatherConfig,
    /// NewsData.io settings
    pub news: NewsConfig,
    /// Google Gemini settings
    pub gemini: GeminiConfig,
    /// User store settings
    pub database: DatabaseConfig,
    /// Token and password hashing settings
    pub auth: AuthConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface to bind
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Origin allowed by CORS; any origin when unset
    pub allowed_origin: Option<String>,
    /// Directory holding the built frontend
    pub static_dir: String,
    /// Upper bound for a whole request in seconds
    pub request_timeout_seconds: u32,
    /// Maximum accepted request body in KiB
    pub body_limit_kb: u32,
    /// PEM certificate chain, enables TLS together with `tls_key_path`
    pub tls_cert_path: Option<String>,
    /// PEM private key
    pub tls_key_path: Option<String>,
}

/// Settings shared by all upstream API clients
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Request timeout in seconds
    pub timeout_seconds: u32,
    /// Retries for transient failures (0 disables retrying)
    pub max_retries: u32,
    /// User agent sent upstream
    pub user_agent: String,
}

/// Open-Meteo configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherConfig {
    /// Base URL for the geocoding API
    pub geocoding_base_url: String,
    /// Base URL for the forecast API
    pub forecast_base_url: String,
}

/// NewsData.io configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NewsConfig {
    /// NewsData.io API key
    pub api_key: Option<String>,
    /// Base URL for the news API
    pub base_url: String,
    /// Article language filter
    pub language: String,
}

/// Google Gemini configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeminiConfig {
    /// Gemini API key
    pub api_key: Option<String>,
    /// Base URL for the Generative Language API
    pub base_url: String,
    /// Model name
    pub model: String,
}

/// User store settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// MongoDB connection string; in-memory store when unset
    pub uri: Option<String>,
    /// Database name
    pub name: String,
}

/// Authentication settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// HMAC secret for signing tokens; auth routes are disabled when unset
    pub jwt_secret: Option<String>,
    /// Token lifetime in hours
    pub token_ttl_hours: u32,
    /// bcrypt cost factor
    pub bcrypt_cost: u32,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    pub level: String,
    /// Log format (pretty or json)
    pub format: String,
    /// OTLP/HTTP collector endpoint for trace export
    pub otlp_endpoint: Option<String>,
}

// Default value functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3032
}

fn default_static_dir() -> String {
    "frontend/dist".to_string()
}

fn default_request_timeout() -> u32 {
    60
}

fn default_body_limit() -> u32 {
    64
}

fn default_upstream_timeout() -> u32 {
    30
}

fn default_user_agent() -> String {
    format!("WeatherWise/{}", env!("CARGO_PKG_VERSION"))
}

fn default_geocoding_base_url() -> String {
    "https://geocoding-api.open-meteo.com/v1".to_string()
}

fn default_forecast_base_url() -> String {
    "https://api.open-meteo.com/v1".to_string()
}

fn default_news_base_url() -> String {
    "https://newsdata.io/api/1".to_string()
}

fn default_news_language() -> String {
    "en".to_string()
}

fn default_gemini_base_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_gemini_model() -> String {
    "gemini-2.0-flash".to_string()
}

fn default_database_name() -> String {
    "weatherwise".to_string()
}

fn default_token_ttl() -> u32 {
    24
}

fn default_bcrypt_cost() -> u32 {
    10
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            allowed_origin: None,
            static_dir: default_static_dir(),
            request_timeout_seconds: default_request_timeout(),
            body_limit_kb: default_body_limit(),
            tls_cert_path: None,
            tls_key_path: None,
        }
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_upstream_timeout(),
            max_retries: 0,
            user_agent: default_user_agent(),
        }
    }
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            geocoding_base_url: default_geocoding_base_url(),
            forecast_base_url: default_forecast_base_url(),
        }
    }
}

impl Default for NewsConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_news_base_url(),
            language: default_news_language(),
        }
    }
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_gemini_base_url(),
            model: default_gemini_model(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            uri: None,
            name: default_database_name(),
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: None,
            token_ttl_hours: default_token_ttl(),
            bcrypt_cost: default_bcrypt_cost(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            otlp_endpoint: None,
        }
    }
}

/// Plain environment variables used by existing deployments and the
/// setting each one overrides.
const ENV_ALIASES: [(&str, &str); 6] = [
    ("PORT", "server.port"),
    ("FRONTEND_URL", "server.allowed_origin"),
    ("NEWS_API_KEY", "news.api_key"),
    ("GEMINI_API_KEY", "gemini.api_key"),
    ("MONGO_URI", "database.uri"),
    ("JWT_SECRET", "auth.jwt_secret"),
];

impl WeatherWiseConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(std::env::var_os("WEATHERWISE_CONFIG").map(PathBuf::from))
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        // Load from file if path is provided or use default location
        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path().unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // WEATHERWISE__SERVER__PORT=8080 style overrides
        builder = builder.add_source(
            Environment::with_prefix("WEATHERWISE")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: WeatherWiseConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_env_aliases(|name| std::env::var(name).ok())?;
        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("weatherwise").join("config.toml"))
    }

    /// Apply the plain deployment variables (`PORT`, `MONGO_URI`, ...)
    pub fn apply_env_aliases<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        for (name, setting) in ENV_ALIASES {
            let Some(value) = lookup(name).filter(|v| !v.trim().is_empty()) else {
                continue;
            };
            match setting {
                "server.port" => {
                    self.server.port = value.trim().parse().with_context(|| {
                        format!("{name} must be a port number, got '{value}'")
                    })?;
                }
                "server.allowed_origin" => self.server.allowed_origin = Some(value),
                "news.api_key" => self.news.api_key = Some(value),
                "gemini.api_key" => self.gemini.api_key = Some(value),
                "database.uri" => self.database.uri = Some(value),
                "auth.jwt_secret" => self.auth.jwt_secret = Some(value),
                _ => {}
            }
        }
        Ok(())
    }

    /// Apply default values to missing configuration fields
    pub fn apply_defaults(&mut self) {
        if self.server.host.is_empty() {
            self.server.host = default_host();
        }
        if self.server.static_dir.is_empty() {
            self.server.static_dir = default_static_dir();
        }
        if self.server.request_timeout_seconds == 0 {
            self.server.request_timeout_seconds = default_request_timeout();
        }
        if self.server.body_limit_kb == 0 {
            self.server.body_limit_kb = default_body_limit();
        }
        if self.upstream.timeout_seconds == 0 {
            self.upstream.timeout_seconds = default_upstream_timeout();
        }
        if self.upstream.user_agent.is_empty() {
            self.upstream.user_agent = default_user_agent();
        }
        if self.weather.geocoding_base_url.is_empty() {
            self.weather.geocoding_base_url = default_geocoding_base_url();
        }
        if self.weather.forecast_base_url.is_empty() {
            self.weather.forecast_base_url = default_forecast_base_url();
        }
        if self.news.base_url.is_empty() {
            self.news.base_url = default_news_base_url();
        }
        if self.news.language.is_empty() {
            self.news.language = default_news_language();
        }
        if self.gemini.base_url.is_empty() {
            self.gemini.base_url = default_gemini_base_url();
        }
        if self.gemini.model.is_empty() {
            self.gemini.model = default_gemini_model();
        }
        if self.database.name.is_empty() {
            self.database.name = default_database_name();
        }
        if self.auth.token_ttl_hours == 0 {
            self.auth.token_ttl_hours = default_token_ttl();
        }
        if self.auth.bcrypt_cost == 0 {
            self.auth.bcrypt_cost = default_bcrypt_cost();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_secrets()?;
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// Validate API keys and signing secrets
    pub fn validate_secrets(&self) -> Result<()> {
        for (label, key) in [
            ("News API key", &self.news.api_key),
            ("Gemini API key", &self.gemini.api_key),
        ] {
            if let Some(key) = key {
                if key.trim().is_empty() {
                    return Err(WeatherWiseError::config(format!(
                        "{label} cannot be empty if provided. Either remove it or provide a valid key."
                    ))
                    .into());
                }
            }
        }

        if let Some(secret) = &self.auth.jwt_secret {
            if secret.len() < 16 {
                return Err(WeatherWiseError::config(
                    "JWT secret is too short. Use at least 16 characters.",
                )
                .into());
            }
        }

        Ok(())
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.upstream.timeout_seconds > 300 {
            return Err(
                WeatherWiseError::config("Upstream timeout cannot exceed 300 seconds").into(),
            );
        }

        if self.upstream.max_retries > 10 {
            return Err(WeatherWiseError::config("Upstream max retries cannot exceed 10").into());
        }

        if self.server.request_timeout_seconds > 600 {
            return Err(
                WeatherWiseError::config("Request timeout cannot exceed 600 seconds").into(),
            );
        }

        if !(4..=31).contains(&self.auth.bcrypt_cost) {
            return Err(
                WeatherWiseError::config("bcrypt cost must be between 4 and 31").into(),
            );
        }

        if self.auth.token_ttl_hours > 720 {
            return Err(
                WeatherWiseError::config("Token lifetime cannot exceed 720 hours (30 days)")
                    .into(),
            );
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(WeatherWiseError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(WeatherWiseError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        for (label, url) in [
            ("Geocoding base URL", &self.weather.geocoding_base_url),
            ("Forecast base URL", &self.weather.forecast_base_url),
            ("News base URL", &self.news.base_url),
            ("Gemini base URL", &self.gemini.base_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(WeatherWiseError::config(format!(
                    "{label} must be a valid HTTP or HTTPS URL"
                ))
                .into());
            }
        }

        if self.server.tls_cert_path.is_some() != self.server.tls_key_path.is_some() {
            return Err(WeatherWiseError::config(
                "TLS needs both tls_cert_path and tls_key_path",
            )
            .into());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = WeatherWiseConfig::default();
        assert_eq!(config.server.port, 3032);
        assert_eq!(
            config.weather.geocoding_base_url,
            "https://geocoding-api.open-meteo.com/v1"
        );
        assert_eq!(config.news.language, "en");
        assert_eq!(config.auth.token_ttl_hours, 24);
        assert_eq!(config.auth.bcrypt_cost, 10);
        assert_eq!(config.upstream.max_retries, 0);
        assert!(config.news.api_key.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_short_jwt_secret() {
        let mut config = WeatherWiseConfig::default();
        config.auth.jwt_secret = Some("short".to_string());
        let result = config.validate_secrets();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("too short"));
    }

    #[test]
    fn test_config_validation_empty_api_key() {
        let mut config = WeatherWiseConfig::default();
        config.news.api_key = Some("  ".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_invalid_log_level() {
        let mut config = WeatherWiseConfig::default();
        config.logging.level = "invalid".to_string();
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Invalid log level"));
    }

    #[test]
    fn test_config_validation_numeric_ranges() {
        let mut config = WeatherWiseConfig::default();
        config.upstream.timeout_seconds = 500;
        let result = config.validate();
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("timeout cannot exceed")
        );

        let mut config = WeatherWiseConfig::default();
        config.auth.bcrypt_cost = 2;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_tls_pair() {
        let mut config = WeatherWiseConfig::default();
        config.server.tls_cert_path = Some("cert.pem".to_string());
        assert!(config.validate().is_err());

        config.server.tls_key_path = Some("key.pem".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_aliases_override() {
        let vars = HashMap::from([
            ("PORT", "8080"),
            ("NEWS_API_KEY", "pub_123456"),
            ("MONGO_URI", "mongodb://localhost:27017"),
            ("JWT_SECRET", "a-very-long-signing-secret"),
            ("GEMINI_API_KEY", ""),
        ]);

        let mut config = WeatherWiseConfig::default();
        config
            .apply_env_aliases(|name| vars.get(name).map(|v| (*v).to_string()))
            .unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.news.api_key.as_deref(), Some("pub_123456"));
        assert_eq!(
            config.database.uri.as_deref(),
            Some("mongodb://localhost:27017")
        );
        assert!(config.gemini.api_key.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_alias_bad_port() {
        let mut config = WeatherWiseConfig::default();
        let result = config.apply_env_aliases(|name| (name == "PORT").then(|| "http".to_string()));
        assert!(result.is_err());
    }

    #[test]
    fn test_apply_defaults_fills_blanks() {
        let mut config = WeatherWiseConfig::default();
        config.logging.level.clear();
        config.auth.bcrypt_cost = 0;
        config.apply_defaults();
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.auth.bcrypt_cost, 10);
    }

    #[test]
    fn test_config_path_generation() {
        if let Some(path) = WeatherWiseConfig::get_config_path() {
            assert!(path.to_string_lossy().contains("weatherwise"));
            assert!(path.to_string_lossy().contains("config.toml"));
        }
    }
}
