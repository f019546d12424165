use std::sync::Arc;

use anyhow::{Context, Result};
use weatherwise::auth::{InMemoryUserStore, MongoUserStore, UserStore};
use weatherwise::{AppState, WeatherWiseConfig, telemetry, web};

#[tokio::main]
async fn main() -> Result<()> {
    let config = WeatherWiseConfig::load().context("Failed to load configuration")?;
    let telemetry = telemetry::init(&config.logging)?;

    tracing::info!("Starting WeatherWise {}", weatherwise::VERSION);

    let users: Arc<dyn UserStore> = match config.database.uri.as_deref() {
        Some(uri) => Arc::new(
            MongoUserStore::connect(uri, &config.database.name)
                .await
                .context("Failed to connect to MongoDB")?,
        ),
        None => {
            tracing::warn!("No database URI configured, accounts are kept in memory only");
            Arc::new(InMemoryUserStore::new())
        }
    };

    let state = AppState::new(config, users).context("Failed to initialize application")?;
    let result = web::serve(Arc::new(state)).await;

    telemetry.shutdown();
    result
}
