//! Boundary mapping from provider/storage errors into the application-level
//! hierarchy, so the presentation layer only ever sees [`AppError`].

use skycast_core::error::ReqwestErrorExt;
use skycast_core::{AppError, WeatherError};
use skycast_weather::WeatherError as ProviderError;

use crate::storage::StorageError;

/// Map a provider error into the application hierarchy.
///
/// Transport failures become [`AppError::Network`]; classified provider
/// responses keep their distinction (not-found vs rejected credential vs
/// anything else) with the provider's message detail preserved.
pub fn weather_error(e: ProviderError) -> AppError {
    match e {
        ProviderError::Network(e) => AppError::Network(e.into_network_error()),
        ProviderError::LocationNotFound(detail) => {
            AppError::Weather(WeatherError::LocationNotFound(detail))
        }
        ProviderError::Unauthorized(detail) => {
            AppError::Weather(WeatherError::InvalidApiKey(detail))
        }
        ProviderError::Api { message, .. } => AppError::Weather(WeatherError::ApiError(message)),
    }
}

/// Map a storage error into the application hierarchy.
pub fn storage_error(e: StorageError) -> AppError {
    AppError::Service(e.to_string())
}
