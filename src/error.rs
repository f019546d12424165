//! Error types and handling for the `WeatherWise` API

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Main error type for the `WeatherWise` application
#[derive(Error, Debug)]
pub enum WeatherWiseError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Input validation errors
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// A looked-up resource does not exist
    #[error("Not found: {message}")]
    NotFound { message: String },

    /// Credentials were rejected or missing
    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    /// A bearer token could not be decoded or has expired
    #[error("Invalid token: {message}")]
    InvalidToken { message: String },

    /// Third-party API communication errors
    #[error("{service} error: {message}")]
    Upstream {
        service: &'static str,
        message: String,
    },

    /// User store errors
    #[error("Database error: {message}")]
    Database { message: String },

    /// General application errors
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl WeatherWiseError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new not-found error
    pub fn not_found<S: Into<String>>(message: S) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Create a new unauthorized error
    pub fn unauthorized<S: Into<String>>(message: S) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    /// Create a new invalid-token error
    pub fn invalid_token<S: Into<String>>(message: S) -> Self {
        Self::InvalidToken {
            message: message.into(),
        }
    }

    /// Create a new upstream error for the named service
    pub fn upstream<S: Into<String>>(service: &'static str, message: S) -> Self {
        Self::Upstream {
            service,
            message: message.into(),
        }
    }

    /// Create a new database error
    pub fn database<S: Into<String>>(message: S) -> Self {
        Self::Database {
            message: message.into(),
        }
    }

    /// Create a new internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// HTTP status this error is reported with
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation { .. } | Self::InvalidToken { .. } => StatusCode::BAD_REQUEST,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            Self::Config { .. }
            | Self::Upstream { .. }
            | Self::Database { .. }
            | Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message returned to API clients.
    ///
    /// Validation, lookup and upstream messages are passed through as-is;
    /// store and I/O failures are replaced by a generic text.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Config { message }
            | Self::Validation { message }
            | Self::NotFound { message }
            | Self::Unauthorized { message }
            | Self::InvalidToken { message }
            | Self::Upstream { message, .. } => message.clone(),
            Self::Database { .. } | Self::Internal { .. } => {
                "Internal server error".to_string()
            }
        }
    }
}

impl From<mongodb::error::Error> for WeatherWiseError {
    fn from(err: mongodb::error::Error) -> Self {
        Self::database(err.to_string())
    }
}

impl IntoResponse for WeatherWiseError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        } else {
            tracing::debug!("Request rejected: {}", self);
        }
        (status, Json(json!({ "error": self.user_message() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let config_err = WeatherWiseError::config("missing API key");
        assert!(matches!(config_err, WeatherWiseError::Config { .. }));

        let upstream_err = WeatherWiseError::upstream("NewsData", "connection failed");
        assert!(matches!(
            upstream_err,
            WeatherWiseError::Upstream {
                service: "NewsData",
                ..
            }
        ));

        let validation_err = WeatherWiseError::validation("City is required");
        assert!(matches!(validation_err, WeatherWiseError::Validation { .. }));
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            WeatherWiseError::validation("x").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            WeatherWiseError::invalid_token("x").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            WeatherWiseError::unauthorized("x").status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            WeatherWiseError::not_found("x").status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            WeatherWiseError::upstream("Open-Meteo", "x").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_user_messages() {
        let err = WeatherWiseError::validation("Passwords do not match");
        assert_eq!(err.user_message(), "Passwords do not match");

        let err = WeatherWiseError::upstream("NewsData", "Failed to fetch news for climate");
        assert_eq!(err.user_message(), "Failed to fetch news for climate");

        let err = WeatherWiseError::database("E11000 duplicate key");
        assert_eq!(err.user_message(), "Internal server error");
    }
}
