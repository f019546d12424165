//! Integration tests for the WeatherWise HTTP API
//!
//! Every test drives the full router with an in-memory user store and
//! wiremock servers standing in for the upstream APIs.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;
use weatherwise::auth::InMemoryUserStore;
use weatherwise::news::NewsCategory;
use weatherwise::{AppState, WeatherWiseConfig, web};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const JWT_SECRET: &str = "integration-test-secret";

fn test_config(upstream: &MockServer) -> WeatherWiseConfig {
    let mut config = WeatherWiseConfig::default();
    config.weather.geocoding_base_url = upstream.uri();
    config.weather.forecast_base_url = upstream.uri();
    config.news.base_url = upstream.uri();
    config.news.api_key = Some("pub_test".to_string());
    config.gemini.base_url = upstream.uri();
    config.gemini.api_key = Some("gemini-test".to_string());
    config.auth.jwt_secret = Some(JWT_SECRET.to_string());
    config.auth.bcrypt_cost = 4;
    config
}

fn app(config: WeatherWiseConfig) -> Router {
    let state = AppState::new(config, Arc::new(InMemoryUserStore::new())).unwrap();
    web::build_router(Arc::new(state))
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn registration(email: &str) -> Value {
    json!({
        "fullName": "Mary Anning",
        "email": email,
        "password": "fossil-hunter",
        "confirmPassword": "fossil-hunter"
    })
}

async fn mount_geocoding(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("name", "Berlin"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{
                "name": "Berlin",
                "latitude": 52.52437,
                "longitude": 13.41053,
                "country": "Germany",
                "timezone": "Europe/Berlin"
            }]
        })))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("name", "Nowhereville"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_weather_for_known_city() {
    let upstream = MockServer::start().await;
    mount_geocoding(&upstream).await;
    Mock::given(method("GET"))
        .and(path("/forecast"))
        .and(query_param("timezone", "Europe/Berlin"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "timezone": "Europe/Berlin",
            "daily": {
                "time": ["2025-06-01", "2025-06-02", "2025-06-03"],
                "temperature_2m_max": [24.1, 26.3, 22.0],
                "temperature_2m_min": [13.0, 15.2, 12.8],
                "precipitation_sum": [0.0, 1.2, 4.5]
            },
            "hourly": {
                "time": ["2025-06-01T00:00"],
                "temperature_2m": [15.1],
                "precipitation": [0.0],
                "wind_speed_10m": [7.2]
            }
        })))
        .mount(&upstream)
        .await;

    let app = app(test_config(&upstream));
    let (status, body) = send(&app, get("/api/weather?city=Berlin")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["city"], "Berlin");
    let days = body["daily"]["time"].as_array().unwrap().len();
    assert_eq!(days, 3);
    assert_eq!(body["daily"]["temperature_2m_max"].as_array().unwrap().len(), days);
    assert_eq!(body["hourly"]["wind_speed_10m"][0], 7.2);
}

#[tokio::test]
async fn test_weather_errors() {
    let upstream = MockServer::start().await;
    mount_geocoding(&upstream).await;
    let app = app(test_config(&upstream));

    let (status, body) = send(&app, get("/api/weather")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "City is required");

    let (status, body) = send(&app, get("/api/weather?city=Nowhereville")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "City not found.");
}

#[tokio::test]
async fn test_news_all_categories() {
    let upstream = MockServer::start().await;
    for category in NewsCategory::ALL {
        Mock::given(method("GET"))
            .and(path("/news"))
            .and(query_param("q", category.query()))
            .and(query_param("apikey", "pub_test"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "success",
                "results": [
                    {"title": "First", "link": "https://example.com/1", "pubDate": "2025-06-01 10:00:00"},
                    {"title": null, "link": null, "description": "No link here"}
                ],
                "nextPage": format!("{}-next", category.key())
            })))
            .expect(1)
            .mount(&upstream)
            .await;
    }

    let app = app(test_config(&upstream));
    let (status, body) = send(&app, get("/api/news?category=all")).await;

    assert_eq!(status, StatusCode::OK);
    let articles = body["articles"].as_array().unwrap();
    assert_eq!(articles.len(), 8);
    for category in NewsCategory::ALL {
        assert!(articles.iter().any(|a| a["category"] == category.key()));
        assert_eq!(body["nextPage"][category.key()], format!("{}-next", category.key()));
    }
    assert!(articles.iter().all(|a| !a["url"].as_str().unwrap().is_empty()));
    assert_eq!(articles[1]["url"], "#");
    assert_eq!(articles[1]["title"], "Untitled Article");
}

#[tokio::test]
async fn test_news_rejects_unknown_category() {
    let upstream = MockServer::start().await;
    let app = app(test_config(&upstream));

    let (status, _) = send(&app, get("/api/news?category=sports")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_news_without_api_key() {
    let upstream = MockServer::start().await;
    let mut config = test_config(&upstream);
    config.news.api_key = None;
    let app = app(config);

    let (status, body) = send(&app, get("/api/news")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "News API key not configured");
}

#[tokio::test]
async fn test_register_signin_and_profile() {
    let upstream = MockServer::start().await;
    let app = app(test_config(&upstream));

    let (status, body) = send(&app, post_json("/register", registration("mary@example.com"))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["user"]["fullName"], "Mary Anning");
    assert!(body["user"].get("password").is_none());
    assert!(body["token"].as_str().is_some_and(|t| !t.is_empty()));

    let (status, body) = send(
        &app,
        post_json(
            "/signin",
            json!({"email": "mary@example.com", "password": "fossil-hunter"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let token = body["token"].as_str().unwrap().to_string();

    let request = Request::builder()
        .uri("/profile")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["email"], "mary@example.com");
}

#[tokio::test]
async fn test_duplicate_registration_is_rejected() {
    let upstream = MockServer::start().await;
    let app = app(test_config(&upstream));

    let (status, _) = send(&app, post_json("/register", registration("mary@example.com"))).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(&app, post_json("/register", registration("MARY@example.com"))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "User already exists");
}

#[tokio::test]
async fn test_invalid_credentials_are_indistinguishable() {
    let upstream = MockServer::start().await;
    let app = app(test_config(&upstream));
    send(&app, post_json("/register", registration("mary@example.com"))).await;

    let wrong_password = send(
        &app,
        post_json("/signin", json!({"email": "mary@example.com", "password": "nope"})),
    )
    .await;
    let unknown_email = send(
        &app,
        post_json("/signin", json!({"email": "nobody@example.com", "password": "nope"})),
    )
    .await;

    assert_eq!(wrong_password.0, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_password, unknown_email);
    assert_eq!(unknown_email.1["error"], "Invalid credentials");
}

#[tokio::test]
async fn test_profile_token_checks() {
    let upstream = MockServer::start().await;
    let app = app(test_config(&upstream));

    let (status, _) = send(&app, get("/profile")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let request = Request::builder()
        .uri("/profile")
        .header(header::AUTHORIZATION, "Bearer garbage.token.value")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid token.");
}

#[tokio::test]
async fn test_register_with_mismatched_passwords() {
    let upstream = MockServer::start().await;
    let app = app(test_config(&upstream));

    let mut body = registration("mary@example.com");
    body["confirmPassword"] = json!("something-else");
    let (status, body) = send(&app, post_json("/register", body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Passwords do not match");
}

#[tokio::test]
async fn test_chat_weather_question() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("name", "berlin"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{
                "name": "Berlin",
                "latitude": 52.52437,
                "longitude": 13.41053,
                "country": "Germany",
                "timezone": "Europe/Berlin"
            }]
        })))
        .mount(&upstream)
        .await;
    Mock::given(method("GET"))
        .and(path("/forecast"))
        .and(query_param("forecast_days", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "current_units": {"temperature_2m": "°C", "relative_humidity_2m": "%", "wind_speed_10m": "km/h"},
            "current": {"temperature_2m": 21.5, "relative_humidity_2m": 55, "wind_speed_10m": 9.0, "weather_code": 1},
            "daily": {
                "time": ["2025-06-01", "2025-06-02"],
                "weather_code": [1, 95],
                "temperature_2m_max": [24.0, 27.5],
                "temperature_2m_min": [14.0, 16.0]
            }
        })))
        .mount(&upstream)
        .await;

    let app = app(test_config(&upstream));
    let (status, body) = send(
        &app,
        post_json("/api/chat", json!({"message": "What's the weather in Berlin?"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["intent"]["type"], "weather_at");
    assert_eq!(body["intent"]["location"], "berlin");

    let reply = body["reply"].as_str().unwrap();
    assert!(reply.starts_with("Current weather in Berlin, Germany:\nTemperature: 21.5°C"));
    assert!(reply.contains("Humidity: 55%"));
    assert!(reply.ends_with("Tomorrow: Thunderstorm, high of 27.5°C, low of 16°C"));
}

#[tokio::test]
async fn test_gemini_endpoint() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-2.0-flash:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{"content": {"parts": [{"text": "Hello there!"}]}}]
        })))
        .mount(&upstream)
        .await;

    let app = app(test_config(&upstream));
    let (status, body) = send(&app, post_json("/api/gemini", json!({"message": "hi"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["reply"], "Hello there!");

    let (status, body) = send(&app, post_json("/api/gemini", json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Message is required");
}

#[tokio::test]
async fn test_health() {
    let upstream = MockServer::start().await;
    let app = app(test_config(&upstream));

    let (status, body) = send(&app, get("/api/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], weatherwise::VERSION);
}

#[tokio::test]
async fn test_oversized_body_is_rejected() {
    let upstream = MockServer::start().await;
    let app = app(test_config(&upstream));

    let message = "a".repeat(80 * 1024);
    let body = json!({ "message": message }).to_string();
    let request = Request::builder()
        .method("POST")
        .uri("/api/chat")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::CONTENT_LENGTH, body.len())
        .body(Body::from(body))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn test_cors_preflight_for_configured_origin() {
    let upstream = MockServer::start().await;
    let mut config = test_config(&upstream);
    config.server.allowed_origin = Some("https://weatherwise.example".to_string());
    let app = app(config);

    let request = Request::builder()
        .method("OPTIONS")
        .uri("/api/chat")
        .header(header::ORIGIN, "https://weatherwise.example")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "https://weatherwise.example"
    );
}
