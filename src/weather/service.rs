use std::sync::Arc;

use axum::http::StatusCode;
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

use crate::error::HttpError;
use crate::geocode::Geocoder;
use crate::impl_into_response;
use crate::models::{validate_coordinates, CoordinateError, GeoLocation, WeatherSnapshot};
use crate::provider::{ProviderError, WeatherProvider};

#[derive(Error, Debug)]
pub enum WeatherError {
    #[error(transparent)]
    InvalidCoordinates(#[from] CoordinateError),

    #[error("Your provided location of: \"{0}\" cannot be found in the world. Please try again with more accuracy, e.g: \"London, UK\"")]
    LocationNotFound(String),

    #[error("Could not find the current weather information")]
    MissingCondition,

    #[error("Upstream provider failed: {0}")]
    Provider(#[from] ProviderError),
}

impl HttpError for WeatherError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidCoordinates(_) | Self::LocationNotFound(_) => StatusCode::BAD_REQUEST,
            Self::MissingCondition | Self::Provider(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_code(&self) -> Option<&'static str> {
        match self {
            Self::InvalidCoordinates(_) => Some("INVALID_COORDINATES"),
            Self::LocationNotFound(_) => Some("LOCATION_NOT_FOUND"),
            Self::MissingCondition | Self::Provider(_) => Some("WEATHER_UNAVAILABLE"),
        }
    }

    fn public_message(&self) -> String {
        if self.status_code().is_client_error() {
            self.to_string()
        } else {
            "An error has occurred when getting the current weather data".to_string()
        }
    }
}

impl_into_response!(WeatherError);

/// Current conditions for a geocoded location
#[derive(Debug, Serialize, ToSchema)]
pub struct CurrentWeatherResponse {
    pub geocoded_location: GeoLocation,
    pub weather: WeatherSnapshot,
}

pub struct WeatherService {
    geocoder: Arc<Geocoder>,
    provider: Arc<dyn WeatherProvider>,
}

impl WeatherService {
    pub fn new(geocoder: Arc<Geocoder>, provider: Arc<dyn WeatherProvider>) -> Self {
        Self { geocoder, provider }
    }

    /// Current conditions at coordinates, collapsed to the primary condition
    pub async fn current_weather(
        &self,
        lat: f64,
        lon: f64,
    ) -> Result<WeatherSnapshot, WeatherError> {
        validate_coordinates(lat, lon)?;

        let sample = self.provider.current_weather(lat, lon).await?;
        let snapshot = sample
            .into_snapshot()
            .ok_or(WeatherError::MissingCondition)?;

        tracing::info!(
            lat = %lat,
            lon = %lon,
            temp = %snapshot.temperature,
            "Current weather fetched successfully"
        );

        Ok(snapshot)
    }

    /// Geocode free text then fetch its current conditions
    pub async fn weather_for_location(
        &self,
        location: &str,
    ) -> Result<CurrentWeatherResponse, WeatherError> {
        let geocoded_location = self
            .geocoder
            .resolve(location)
            .await?
            .ok_or_else(|| WeatherError::LocationNotFound(location.to_string()))?;

        let weather = self
            .current_weather(geocoded_location.lat, geocoded_location.lon)
            .await?;

        Ok(CurrentWeatherResponse {
            geocoded_location,
            weather,
        })
    }
}
