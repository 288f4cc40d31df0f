//! Weather domain for Skycast
//!
//! Provides the weather data model, unit conversion, forecast aggregation,
//! and the OpenWeatherMap provider client.

pub mod forecast;
pub mod provider;
pub mod types;
pub mod units;

pub use forecast::{daily_summaries, daily_summaries_in, MAX_FORECAST_DAYS};
pub use provider::WeatherProvider;
pub use types::*;
