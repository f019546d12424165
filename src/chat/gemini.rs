//! Google Gemini `generateContent` adapter

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::config::GeminiConfig;
use crate::upstream::{self, UpstreamClient};
use crate::{Result, WeatherWiseError};

const SERVICE: &str = "Gemini";
const API_KEY_HEADER: &str = "x-goog-api-key";

const SYSTEM_INSTRUCTION: &str = "You are WeatherWise, a friendly weather assistant. \
Answer briefly and helpfully. When a question is about current conditions for a place, \
suggest asking for the weather in that place by name.";

/// Text generation client
#[derive(Clone)]
pub struct GeminiClient {
    client: UpstreamClient,
    endpoint: String,
    api_key: String,
}

impl GeminiClient {
    /// Create a client, or `None` when no API key is configured
    pub fn from_config(client: UpstreamClient, config: &GeminiConfig) -> Option<Self> {
        let api_key = config.api_key.clone()?;
        Some(Self {
            client,
            endpoint: format!(
                "{}/v1beta/models/{}:generateContent",
                config.base_url.trim_end_matches('/'),
                config.model
            ),
            api_key,
        })
    }

    /// Generate a reply; `None` when the model returned no text
    #[instrument(skip(self, message), fields(chars = message.chars().count()))]
    pub async fn generate(&self, message: &str) -> Result<Option<String>> {
        if message.trim().is_empty() {
            return Err(WeatherWiseError::validation("Message is required"));
        }

        let request = GenerateRequest {
            system_instruction: Content::text(None, SYSTEM_INSTRUCTION),
            contents: vec![Content::text(Some("user"), message)],
        };

        let response: GenerateResponse = upstream::send_json(
            SERVICE,
            self.client
                .post(&self.endpoint)
                .header(API_KEY_HEADER, &self.api_key)
                .json(&request),
        )
        .await?;

        let reply = response.into_text();
        debug!("Gemini produced {} reply", if reply.is_some() { "a" } else { "no" });
        Ok(reply)
    }
}

#[derive(Debug, Serialize)]
struct GenerateRequest {
    system_instruction: Content,
    contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize, Default)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

impl Content {
    fn text(role: Option<&str>, text: &str) -> Self {
        Self {
            role: role.map(str::to_string),
            parts: vec![Part {
                text: Some(text.to_string()),
            }],
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Content,
}

impl GenerateResponse {
    /// Join the text parts of the first candidate
    fn into_text(self) -> Option<String> {
        let candidate = self.candidates.into_iter().next()?;
        let text: String = candidate
            .content
            .parts
            .into_iter()
            .filter_map(|part| part.text)
            .collect();
        (!text.trim().is_empty()).then_some(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::UpstreamConfig;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> GeminiClient {
        let config = GeminiConfig {
            api_key: Some("test-key".to_string()),
            base_url: server.uri(),
            model: "gemini-2.0-flash".to_string(),
        };
        let http = upstream::build_client(&UpstreamConfig::default()).unwrap();
        GeminiClient::from_config(http, &config).unwrap()
    }

    #[test]
    fn test_disabled_without_key() {
        let http = upstream::build_client(&UpstreamConfig::default()).unwrap();
        assert!(GeminiClient::from_config(http, &GeminiConfig::default()).is_none());
    }

    #[tokio::test]
    async fn test_generate_joins_parts() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1beta/models/gemini-2.0-flash:generateContent"))
            .and(header("x-goog-api-key", "test-key"))
            .and(body_partial_json(json!({
                "contents": [{"role": "user", "parts": [{"text": "tell me a joke"}]}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{
                    "content": {
                        "role": "model",
                        "parts": [{"text": "Why did the cloud "}, {"text": "stay home?"}]
                    },
                    "finishReason": "STOP"
                }]
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let reply = client_for(&mock_server).generate("tell me a joke").await.unwrap();
        assert_eq!(reply.as_deref(), Some("Why did the cloud stay home?"));
    }

    #[tokio::test]
    async fn test_generate_without_candidates() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "promptFeedback": {"blockReason": "SAFETY"}
            })))
            .mount(&mock_server)
            .await;

        let reply = client_for(&mock_server).generate("hello").await.unwrap();
        assert!(reply.is_none());
    }

    #[tokio::test]
    async fn test_generate_upstream_error() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(403).set_body_string("API key not valid"))
            .mount(&mock_server)
            .await;

        let result = client_for(&mock_server).generate("hello").await;
        assert!(matches!(result, Err(WeatherWiseError::Upstream { service: "Gemini", .. })));
    }
}
