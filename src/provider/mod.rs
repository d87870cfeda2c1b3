mod models;
mod openweather;

pub use openweather::OpenWeatherClient;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{GeoLocation, WeatherSample};

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Failed to fetch data: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Upstream rejected the API key")]
    Unauthorized,

    #[error("Upstream API error (HTTP {status}): {message}")]
    ApiError { status: u16, message: String },
}

/// Upstream weather data source
///
/// The services only depend on this trait so they can run against a stub in tests.
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    /// Resolve free-text location to coordinates, `None` when nothing matches
    async fn geocode(&self, location: &str) -> Result<Option<GeoLocation>, ProviderError>;

    /// Current conditions at the given coordinates
    async fn current_weather(&self, lat: f64, lon: f64) -> Result<WeatherSample, ProviderError>;

    /// Forecast steps (3-hour cadence) over the provider's horizon, in upstream order
    async fn forecast_samples(
        &self,
        lat: f64,
        lon: f64,
    ) -> Result<Vec<WeatherSample>, ProviderError>;
}
