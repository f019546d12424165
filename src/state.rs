//! Shared, read-only application state

use std::sync::Arc;

use tracing::warn;

use crate::auth::{AuthService, UserStore};
use crate::chat::{ChatAssistant, GeminiClient};
use crate::config::WeatherWiseConfig;
use crate::news::NewsClient;
use crate::upstream;
use crate::weather::OpenMeteoClient;
use crate::Result;

pub struct AppState {
    pub config: WeatherWiseConfig,
    pub weather: OpenMeteoClient,
    pub news: NewsClient,
    /// `None` without a Gemini API key
    pub gemini: Option<GeminiClient>,
    pub assistant: ChatAssistant,
    /// `None` without a JWT secret
    pub auth: Option<AuthService>,
}

impl AppState {
    /// Build every adapter around one pooled HTTP client
    pub fn new(config: WeatherWiseConfig, users: Arc<dyn UserStore>) -> Result<Self> {
        let http = upstream::build_client(&config.upstream)?;

        let weather = OpenMeteoClient::new(http.clone(), &config.weather);
        let news = NewsClient::new(http.clone(), &config.news);
        let gemini = GeminiClient::from_config(http, &config.gemini);
        if gemini.is_none() {
            warn!("No Gemini API key configured, general chat questions will not be answered");
        }
        let assistant = ChatAssistant::new(weather.clone(), gemini.clone());

        let auth = match config.auth.jwt_secret.as_deref() {
            Some(secret) => Some(AuthService::new(users, secret, &config.auth)),
            None => {
                warn!("No JWT secret configured, account endpoints are disabled");
                None
            }
        };

        Ok(Self {
            config,
            weather,
            news,
            gemini,
            assistant,
            auth,
        })
    }
}
