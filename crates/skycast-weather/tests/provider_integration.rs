//! Integration tests for WeatherProvider using wiremock.
//!
//! These tests verify request shape and failure classification against a
//! mock OpenWeatherMap server.

use skycast_weather::{WeatherError, WeatherProvider};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn current_body(name: &str, country: &str, temp: f64) -> serde_json::Value {
    serde_json::json!({
        "coord": {"lon": -0.1257, "lat": 51.5085},
        "weather": [{"id": 803, "main": "Clouds", "description": "broken clouds", "icon": "04d"}],
        "main": {"temp": temp, "feels_like": temp - 0.8, "temp_min": temp - 2.0,
                 "temp_max": temp + 2.0, "pressure": 1012, "humidity": 72},
        "visibility": 10000,
        "wind": {"speed": 4.1, "deg": 250},
        "clouds": {"all": 40},
        "dt": 1754558400,
        "sys": {"country": country, "sunrise": 1754537520, "sunset": 1754592420},
        "name": name
    })
}

fn forecast_body() -> serde_json::Value {
    serde_json::json!({
        "list": [
            {"dt": 1754557200, "main": {"temp": 14.0},
             "weather": [{"id": 500, "description": "light rain", "icon": "10d"}]},
            {"dt": 1754568000, "main": {"temp": 16.5},
             "weather": [{"id": 800, "description": "clear sky", "icon": "01d"}]}
        ]
    })
}

#[tokio::test]
async fn test_current_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .and(query_param("q", "London"))
        .and(query_param("units", "metric"))
        .and(query_param("appid", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_body("London", "GB", 15.0)))
        .mount(&mock_server)
        .await;

    let provider = WeatherProvider::with_base_url("test-key", &mock_server.uri()).unwrap();
    let sample = provider.current("London").await.unwrap();

    assert_eq!(sample.name, "London");
    assert_eq!(sample.country, "GB");
    assert_eq!(sample.temperature, 15.0);
    assert_eq!(sample.location_key(), "London,GB");
}

#[tokio::test]
async fn test_forecast_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/forecast"))
        .and(query_param("q", "London"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body()))
        .mount(&mock_server)
        .await;

    let provider = WeatherProvider::with_base_url("test-key", &mock_server.uri()).unwrap();
    let points = provider.forecast("London").await.unwrap();

    assert_eq!(points.len(), 2);
    assert_eq!(points[0].temperature, 14.0);
    assert_eq!(points[1].condition.description, "clear sky");
}

#[tokio::test]
async fn test_unknown_city_is_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
            "cod": "404", "message": "city not found"
        })))
        .mount(&mock_server)
        .await;

    let provider = WeatherProvider::with_base_url("test-key", &mock_server.uri()).unwrap();
    let err = provider.current("Zzzzinvalidcity").await.unwrap_err();

    match err {
        WeatherError::LocationNotFound(message) => assert_eq!(message, "city not found"),
        other => panic!("expected LocationNotFound, got {:?}", other),
    }
}

#[tokio::test]
async fn test_bad_credential_is_unauthorized_with_detail() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "cod": 401,
            "message": "Invalid API key. Please see https://openweathermap.org/faq#error401 for more info."
        })))
        .mount(&mock_server)
        .await;

    let provider = WeatherProvider::with_base_url("bad-key", &mock_server.uri()).unwrap();
    let err = provider.current("London").await.unwrap_err();

    match err {
        WeatherError::Unauthorized(message) => assert!(message.contains("Invalid API key")),
        other => panic!("expected Unauthorized, got {:?}", other),
    }
}

#[tokio::test]
async fn test_server_error_is_generic_api_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .mount(&mock_server)
        .await;

    let provider = WeatherProvider::with_base_url("test-key", &mock_server.uri()).unwrap();
    let err = provider.current("London").await.unwrap_err();

    match err {
        WeatherError::Api { status, message } => {
            assert_eq!(status, 502);
            assert_eq!(message, "Unknown error");
        }
        other => panic!("expected Api, got {:?}", other),
    }
}
