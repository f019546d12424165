//! Shared HTTP client for third-party APIs
//!
//! One pooled client is built at startup and handed to every adapter.
//! Requests carry the configured timeout; transient failures are retried
//! with exponential backoff only when `upstream.max_retries` is non-zero.

use std::time::{Duration, Instant};

use reqwest::Response;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware, RequestBuilder};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use crate::config::UpstreamConfig;
use crate::{Result, WeatherWiseError};

/// Calls slower than this are logged as warnings
const SLOW_CALL: Duration = Duration::from_secs(5);

pub type UpstreamClient = ClientWithMiddleware;

/// Build the shared client from configuration
pub fn build_client(config: &UpstreamConfig) -> Result<UpstreamClient> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout_seconds.into()))
        .user_agent(config.user_agent.clone())
        .build()
        .map_err(|e| WeatherWiseError::config(format!("Failed to create HTTP client: {e}")))?;

    let mut builder = ClientBuilder::new(client);
    if config.max_retries > 0 {
        let policy = ExponentialBackoff::builder()
            .retry_bounds(Duration::from_millis(200), Duration::from_secs(10))
            .build_with_max_retries(config.max_retries);
        builder = builder.with(RetryTransientMiddleware::new_with_policy(policy));
    }
    Ok(builder.build())
}

/// Send a request and fail on transport errors, keeping the response
/// status for the caller to judge.
pub async fn send(service: &'static str, request: RequestBuilder) -> Result<Response> {
    let start = Instant::now();
    let response = request.send().await.map_err(|e| {
        warn!("{} request failed after {:.3}s: {}", service, start.elapsed().as_secs_f64(), e);
        WeatherWiseError::upstream(service, format!("Failed to reach {service}: {e}"))
    })?;

    let elapsed = start.elapsed();
    debug!(
        "{} responded {} in {:.3}s",
        service,
        response.status(),
        elapsed.as_secs_f64()
    );
    if elapsed > SLOW_CALL {
        warn!("Slow {} response: {:.3}s", service, elapsed.as_secs_f64());
    }
    Ok(response)
}

/// Send a request, require a success status and decode the JSON body
pub async fn send_json<T: DeserializeOwned>(
    service: &'static str,
    request: RequestBuilder,
) -> Result<T> {
    let response = send(service, request).await?;
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(WeatherWiseError::upstream(
            service,
            format!("{service} returned {status}: {}", truncate(&body, 200)),
        ));
    }

    let parsed = response.json::<T>().await.map_err(|e| {
        WeatherWiseError::upstream(service, format!("Invalid response from {service}: {e}"))
    })?;
    info!("{} call succeeded", service);
    Ok(parsed)
}

fn truncate(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[derive(Debug, Deserialize)]
    struct Pong {
        ok: bool,
    }

    #[tokio::test]
    async fn test_send_json_success() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ping"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": true})))
            .mount(&mock_server)
            .await;

        let client = build_client(&UpstreamConfig::default()).unwrap();
        let pong: Pong = send_json("Test", client.get(format!("{}/ping", mock_server.uri())))
            .await
            .unwrap();
        assert!(pong.ok);
    }

    #[tokio::test]
    async fn test_send_json_error_status() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ping"))
            .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
            .mount(&mock_server)
            .await;

        let client = build_client(&UpstreamConfig::default()).unwrap();
        let result: Result<Pong> =
            send_json("Test", client.get(format!("{}/ping", mock_server.uri()))).await;
        let err = result.unwrap_err();
        assert!(matches!(err, WeatherWiseError::Upstream { service: "Test", .. }));
        assert!(err.user_message().contains("503"));
    }

    #[tokio::test]
    async fn test_retries_transient_failures_when_enabled() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ping"))
            .respond_with(ResponseTemplate::new(500))
            .expect(3)
            .mount(&mock_server)
            .await;

        let config = UpstreamConfig {
            max_retries: 2,
            ..UpstreamConfig::default()
        };
        let client = build_client(&config).unwrap();
        let result: Result<Pong> =
            send_json("Test", client.get(format!("{}/ping", mock_server.uri()))).await;
        assert!(result.is_err());
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate("héllo wörld", 4), "héll");
        assert_eq!(truncate("abc", 10), "abc");
    }
}
