use std::sync::Arc;

use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use thiserror::Error;

use super::aggregate::{AggregationError, DailyAggregator};
pub use super::aggregate::{MAX_FORECAST_DAYS, MIN_FORECAST_DAYS};
use super::models::DailyForecastEntry;
use crate::error::HttpError;
use crate::geocode::Geocoder;
use crate::impl_into_response;
use crate::models::{validate_coordinates, CoordinateError, GeoLocation};
use crate::provider::{ProviderError, WeatherProvider};

#[derive(Error, Debug)]
pub enum ForecastError {
    #[error(transparent)]
    InvalidCoordinates(#[from] CoordinateError),

    #[error("Invalid \"days\" value, days must be between 1 and 10 inclusive")]
    InvalidDays(i64),

    #[error("Your provided location of: \"{0}\" cannot be found. Please try again with more accuracy, e.g: \"London, UK\"")]
    LocationNotFound(String),

    #[error("Daily aggregation failed: {0}")]
    Aggregation(#[from] AggregationError),

    #[error("Upstream provider failed: {0}")]
    Provider(#[from] ProviderError),
}

impl HttpError for ForecastError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidCoordinates(_) | Self::InvalidDays(_) | Self::LocationNotFound(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::Aggregation(_) | Self::Provider(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_code(&self) -> Option<&'static str> {
        match self {
            Self::InvalidCoordinates(_) => Some("INVALID_COORDINATES"),
            Self::InvalidDays(_) => Some("INVALID_DAYS"),
            Self::LocationNotFound(_) => Some("LOCATION_NOT_FOUND"),
            Self::Aggregation(_) | Self::Provider(_) => Some("FORECAST_UNAVAILABLE"),
        }
    }

    fn public_message(&self) -> String {
        if self.status_code().is_client_error() {
            self.to_string()
        } else {
            "An error has occurred when getting the weather forecast data".to_string()
        }
    }
}

impl_into_response!(ForecastError);

pub struct ForecastService {
    geocoder: Arc<Geocoder>,
    provider: Arc<dyn WeatherProvider>,
    aggregator: DailyAggregator,
}

impl ForecastService {
    pub fn new(
        geocoder: Arc<Geocoder>,
        provider: Arc<dyn WeatherProvider>,
        aggregator: DailyAggregator,
    ) -> Self {
        Self {
            geocoder,
            provider,
            aggregator,
        }
    }

    fn validate_days(days: i64) -> Result<(), ForecastError> {
        if !(MIN_FORECAST_DAYS..=MAX_FORECAST_DAYS).contains(&days) {
            return Err(ForecastError::InvalidDays(days));
        }
        Ok(())
    }

    /// Geocode free text, treating "no match" as a caller error
    pub async fn locate(&self, location: &str) -> Result<GeoLocation, ForecastError> {
        self.geocoder
            .resolve(location)
            .await?
            .ok_or_else(|| ForecastError::LocationNotFound(location.to_string()))
    }

    /// Daily forecast for the days following now
    pub async fn get_daily_forecast(
        &self,
        lat: f64,
        lon: f64,
        days: i64,
    ) -> Result<Vec<DailyForecastEntry>, ForecastError> {
        self.daily_forecast_at(lat, lon, days, Utc::now()).await
    }

    /// Daily forecast for the `days` calendar days after `reference`
    pub async fn daily_forecast_at(
        &self,
        lat: f64,
        lon: f64,
        days: i64,
        reference: DateTime<Utc>,
    ) -> Result<Vec<DailyForecastEntry>, ForecastError> {
        validate_coordinates(lat, lon)?;
        Self::validate_days(days)?;

        let samples = self.provider.forecast_samples(lat, lon).await?;
        let entries = self.aggregator.aggregate(&samples, days, reference)?;

        tracing::info!(
            lat = %lat,
            lon = %lon,
            days = days,
            "Daily forecast built"
        );

        Ok(entries)
    }

    /// Geocode then build the daily forecast
    pub async fn forecast_for_location(
        &self,
        location: &str,
        days: i64,
    ) -> Result<Vec<DailyForecastEntry>, ForecastError> {
        let found = self.locate(location).await?;

        tracing::debug!(
            location = %location,
            resolved = %found.name,
            lat = %found.lat,
            lon = %found.lon,
            "Fetching forecast"
        );

        self.get_daily_forecast(found.lat, found.lon, days).await
    }
}
