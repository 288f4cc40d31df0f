use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Display unit preference, global to a session.
///
/// Canonical storage is always metric (°C, m/s); switching the display unit
/// recomputes visible values without refetching anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DisplayUnit {
    Celsius,
    #[default]
    Fahrenheit,
}

/// Geographic coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

/// Weather condition as reported by the provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherCondition {
    /// Provider condition code (e.g. 800 for clear sky)
    pub code: i32,
    pub description: String,
    /// Provider icon identifier (e.g. "10d")
    pub icon: String,
}

impl WeatherCondition {
    /// URL of the displayable icon image for this condition
    pub fn icon_url(&self) -> String {
        format!("https://openweathermap.org/img/wn/{}@2x.png", self.icon)
    }
}

/// Current-conditions snapshot for a location.
///
/// Immutable once fetched; a new query replaces it wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSample {
    pub name: String,
    pub country: String,
    pub coord: Coordinates,
    pub observed_at: DateTime<Utc>,
    /// Temperature in °C (canonical unit)
    pub temperature: f64,
    pub feels_like: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    /// Relative humidity, 0-100
    pub humidity: u8,
    /// Pressure in hPa
    pub pressure: u32,
    /// Wind speed in m/s (canonical unit)
    pub wind_speed: f64,
    /// Wind direction in degrees, when reported
    pub wind_direction: Option<u16>,
    /// Cloud cover percentage, when reported
    pub cloudiness: Option<u8>,
    /// Visibility in meters, when reported
    pub visibility: Option<u32>,
    pub sunrise: DateTime<Utc>,
    pub sunset: DateTime<Utc>,
    pub condition: WeatherCondition,
}

impl WeatherSample {
    /// Deduplication identity for favorites: `"{name},{country}"`, exact
    /// case as returned by the provider.
    pub fn location_key(&self) -> String {
        format!("{},{}", self.name, self.country)
    }
}

/// A single sample from the 3-hourly forecast feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub timestamp: DateTime<Utc>,
    /// Temperature in °C
    pub temperature: f64,
    pub condition: WeatherCondition,
}

/// One representative forecast sample standing in for a calendar day.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyForecastSummary {
    /// Calendar date in the timezone the feed was bucketed in
    pub date: NaiveDate,
    pub representative: ForecastPoint,
}

/// Weather provider errors
#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    /// The provider does not recognize the queried city name.
    #[error("Location not found: {0}")]
    LocationNotFound(String),
    /// The provider rejected the credential; carries the provider's detail.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    /// Any other non-success response.
    #[error("Weather API error ({status}): {message}")]
    Api { status: u16, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample() -> WeatherSample {
        WeatherSample {
            name: "London".to_string(),
            country: "GB".to_string(),
            coord: Coordinates { lat: 51.5085, lon: -0.1257 },
            observed_at: Utc.with_ymd_and_hms(2026, 8, 7, 12, 0, 0).unwrap(),
            temperature: 15.0,
            feels_like: 14.2,
            temp_min: 12.8,
            temp_max: 17.1,
            humidity: 72,
            pressure: 1012,
            wind_speed: 4.1,
            wind_direction: Some(250),
            cloudiness: Some(40),
            visibility: Some(10000),
            sunrise: Utc.with_ymd_and_hms(2026, 8, 7, 4, 32, 0).unwrap(),
            sunset: Utc.with_ymd_and_hms(2026, 8, 7, 19, 47, 0).unwrap(),
            condition: WeatherCondition {
                code: 803,
                description: "broken clouds".to_string(),
                icon: "04d".to_string(),
            },
        }
    }

    #[test]
    fn test_location_key_keeps_provider_case() {
        let sample = sample();
        assert_eq!(sample.location_key(), "London,GB");
    }

    #[test]
    fn test_icon_url() {
        let condition = WeatherCondition {
            code: 500,
            description: "light rain".to_string(),
            icon: "10d".to_string(),
        };
        assert_eq!(
            condition.icon_url(),
            "https://openweathermap.org/img/wn/10d@2x.png"
        );
    }

    #[test]
    fn test_sample_round_trips_through_json() {
        let sample = sample();
        let json = serde_json::to_string(&sample).unwrap();
        let back: WeatherSample = serde_json::from_str(&json).unwrap();
        assert_eq!(back, sample);
    }
}
