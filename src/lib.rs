//! `WeatherWise` - weather forecasts, weather news and a weather chat
//! assistant behind one JSON API
//!
//! The library proxies Open-Meteo, NewsData.io and Google Gemini, reshapes
//! their responses into stable contracts and handles account
//! registration and sign-in with bcrypt and JWT.

pub mod api;
pub mod auth;
pub mod chat;
pub mod config;
pub mod error;
pub mod models;
pub mod news;
pub mod state;
pub mod telemetry;
pub mod upstream;
pub mod weather;
pub mod web;

// Re-export core types for public API
pub use auth::{AuthService, InMemoryUserStore, MongoUserStore, UserStore};
pub use chat::{ChatAssistant, GeminiClient, Intent};
pub use config::WeatherWiseConfig;
pub use error::WeatherWiseError;
pub use models::{ForecastBundle, Location, NewsArticle, NewsPage, PublicUser, User};
pub use news::{NewsCategory, NewsClient};
pub use state::AppState;
pub use weather::OpenMeteoClient;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, WeatherWiseError>;
