//! OpenWeatherMap API client.
//!
//! Two read-only queries by city name: current conditions and the
//! 5-day/3-hour forecast feed, both requested in metric units. Non-success
//! statuses are classified so the session layer can tell "unknown city"
//! from "rejected credential" from everything else.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use url::Url;

use crate::types::{
    Coordinates, ForecastPoint, WeatherCondition, WeatherError, WeatherSample,
};

const API_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";
const REQUEST_TIMEOUT_SECS: u64 = 10;

/// OpenWeatherMap API client
#[derive(Debug, Clone)]
pub struct WeatherProvider {
    base_url: Url,
    client: Arc<Client>,
    api_key: String,
}

impl WeatherProvider {
    /// Create a client against the production API.
    pub fn new(api_key: impl Into<String>) -> Result<Self, WeatherError> {
        Self::with_base_url(api_key, API_BASE_URL)
    }

    /// Create a client against a custom base URL (used by tests).
    pub fn with_base_url(
        api_key: impl Into<String>,
        base_url: &str,
    ) -> Result<Self, WeatherError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        let base_url = Url::parse(base_url).map_err(|e| WeatherError::Api {
            status: 0,
            message: format!("invalid base URL: {}", e),
        })?;

        Ok(Self {
            base_url,
            client: Arc::new(client),
            api_key: api_key.into(),
        })
    }

    /// Fetch current conditions for a city by name.
    pub async fn current(&self, city: &str) -> Result<WeatherSample, WeatherError> {
        tracing::debug!("Fetching current conditions for {}", city);

        let response = self.get("weather", city).await?;
        let payload: CurrentPayload = response.json().await?;
        let sample = payload.into_sample();

        tracing::info!(
            "Current conditions for {}: {:.1}°C",
            sample.location_key(),
            sample.temperature
        );
        Ok(sample)
    }

    /// Fetch the 5-day/3-hour forecast feed for a city by name.
    ///
    /// Points are returned in the order the provider delivers them.
    pub async fn forecast(&self, city: &str) -> Result<Vec<ForecastPoint>, WeatherError> {
        tracing::debug!("Fetching forecast for {}", city);

        let response = self.get("forecast", city).await?;
        let payload: ForecastFeedPayload = response.json().await?;
        let points: Vec<ForecastPoint> =
            payload.list.into_iter().map(ForecastEntryPayload::into_point).collect();

        tracing::info!("Fetched {} forecast points for {}", points.len(), city);
        Ok(points)
    }

    async fn get(&self, endpoint: &str, city: &str) -> Result<reqwest::Response, WeatherError> {
        let url = self.endpoint_url(endpoint)?;
        let response = self
            .client
            .get(url)
            .query(&[("q", city), ("appid", self.api_key.as_str()), ("units", "metric")])
            .send()
            .await?;

        Self::check_response(response).await
    }

    fn endpoint_url(&self, endpoint: &str) -> Result<Url, WeatherError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| WeatherError::Api {
                status: 0,
                message: "base URL cannot be a base".to_string(),
            })?
            .pop_if_empty()
            .push(endpoint);
        Ok(url)
    }

    /// Classify non-success statuses: 404 means the city is unknown, 401 a
    /// rejected credential, anything else a provider failure.
    async fn check_response(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, WeatherError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = provider_message(&body);
        match status {
            StatusCode::NOT_FOUND => Err(WeatherError::LocationNotFound(message)),
            StatusCode::UNAUTHORIZED => Err(WeatherError::Unauthorized(message)),
            _ => Err(WeatherError::Api { status: status.as_u16(), message }),
        }
    }
}

/// Best-effort extraction of the provider's `{"cod": …, "message": …}` body.
fn provider_message(body: &str) -> String {
    #[derive(Debug, Deserialize)]
    struct ErrorBody {
        message: Option<String>,
    }

    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .unwrap_or_else(|| "Unknown error".to_string())
}

#[derive(Debug, Deserialize)]
struct CurrentPayload {
    name: String,
    dt: i64,
    coord: CoordPayload,
    sys: SysPayload,
    main: MainPayload,
    wind: WindPayload,
    clouds: Option<CloudsPayload>,
    visibility: Option<u32>,
    weather: Vec<ConditionPayload>,
}

#[derive(Debug, Deserialize)]
struct CoordPayload {
    lat: f64,
    lon: f64,
}

#[derive(Debug, Deserialize)]
struct SysPayload {
    country: String,
    sunrise: i64,
    sunset: i64,
}

#[derive(Debug, Deserialize)]
struct MainPayload {
    temp: f64,
    feels_like: f64,
    temp_min: f64,
    temp_max: f64,
    humidity: u8,
    pressure: u32,
}

#[derive(Debug, Deserialize)]
struct WindPayload {
    speed: f64,
    deg: Option<u16>,
}

#[derive(Debug, Deserialize)]
struct CloudsPayload {
    all: u8,
}

#[derive(Debug, Deserialize)]
struct ConditionPayload {
    id: i32,
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct ForecastFeedPayload {
    list: Vec<ForecastEntryPayload>,
}

#[derive(Debug, Deserialize)]
struct ForecastEntryPayload {
    dt: i64,
    main: ForecastMainPayload,
    weather: Vec<ConditionPayload>,
}

#[derive(Debug, Deserialize)]
struct ForecastMainPayload {
    temp: f64,
}

impl CurrentPayload {
    fn into_sample(self) -> WeatherSample {
        WeatherSample {
            name: self.name,
            country: self.sys.country,
            coord: Coordinates { lat: self.coord.lat, lon: self.coord.lon },
            observed_at: epoch_to_utc(self.dt),
            temperature: self.main.temp,
            feels_like: self.main.feels_like,
            temp_min: self.main.temp_min,
            temp_max: self.main.temp_max,
            humidity: self.main.humidity,
            pressure: self.main.pressure,
            wind_speed: self.wind.speed,
            wind_direction: self.wind.deg,
            cloudiness: self.clouds.map(|c| c.all),
            visibility: self.visibility,
            sunrise: epoch_to_utc(self.sys.sunrise),
            sunset: epoch_to_utc(self.sys.sunset),
            condition: first_condition(self.weather),
        }
    }
}

impl ForecastEntryPayload {
    fn into_point(self) -> ForecastPoint {
        ForecastPoint {
            timestamp: epoch_to_utc(self.dt),
            temperature: self.main.temp,
            condition: first_condition(self.weather),
        }
    }
}

fn epoch_to_utc(secs: i64) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(secs, 0).unwrap_or_else(Utc::now)
}

fn first_condition(list: Vec<ConditionPayload>) -> WeatherCondition {
    list.into_iter()
        .next()
        .map(|c| WeatherCondition { code: c.id, description: c.description, icon: c.icon })
        .unwrap_or_else(|| WeatherCondition {
            code: 0,
            description: "unknown".to_string(),
            icon: "01d".to_string(),
        })
}
