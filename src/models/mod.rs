//! Data models for the WeatherWise API
//!
//! This module contains the core domain models organized by concern:
//! - Location: Geocoded places
//! - Forecast: Daily and hourly series returned to the frontend
//! - Weather: Current conditions used by the chat assistant
//! - News: Normalized articles and pagination cursors
//! - User: Accounts and their public projection

pub mod forecast;
pub mod location;
pub mod news;
pub mod user;
pub mod weather;

// Re-export all public types for convenient access
pub use forecast::{DailyForecast, ForecastBundle, HourlyForecast};
pub use location::Location;
pub use news::{NewsArticle, NewsPage};
pub use user::{NewUser, PublicUser, User};
pub use weather::{ConditionUnits, CurrentConditions, DailyOutlook};
