use axum::{extract::State, http::StatusCode, Json};
use thiserror::Error;

use super::models::{DailyForecastEntry, OverviewResponse};
use super::service::ForecastError;
use crate::error::{ErrorResponse, HttpError};
use crate::extractors::ForecastParams;
use crate::impl_into_response;
use crate::weather::WeatherError;
use crate::AppState;

/// Get the daily forecast (one representative entry per day, starting tomorrow)
///
/// GET /api/v1/forecast?location=London,UK&days=3
#[utoipa::path(
    get,
    path = "/api/v1/forecast",
    tag = "forecast",
    params(
        ("location" = String, Query, description = "Free-text location, e.g. \"London, UK\""),
        ("days" = Option<i64>, Query, description = "Number of days starting tomorrow")
    ),
    responses(
        (status = 200, description = "Daily forecast", body = [DailyForecastEntry]),
        (status = 400, description = "Invalid parameters or unknown location", body = ErrorResponse),
        (status = 500, description = "Forecast unavailable", body = ErrorResponse)
    )
)]
pub async fn get_forecast(
    State(state): State<AppState>,
    params: ForecastParams,
) -> Result<Json<Vec<DailyForecastEntry>>, ForecastError> {
    let forecast = state
        .forecast_service
        .forecast_for_location(&params.location, params.days)
        .await?;
    Ok(Json(forecast))
}

#[derive(Error, Debug)]
pub enum OverviewError {
    #[error(transparent)]
    Weather(#[from] WeatherError),

    #[error(transparent)]
    Forecast(#[from] ForecastError),
}

impl HttpError for OverviewError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Weather(e) => e.status_code(),
            Self::Forecast(e) => e.status_code(),
        }
    }

    fn error_code(&self) -> Option<&'static str> {
        match self {
            Self::Weather(e) => e.error_code(),
            Self::Forecast(e) => e.error_code(),
        }
    }

    fn public_message(&self) -> String {
        match self {
            Self::Weather(e) => e.public_message(),
            Self::Forecast(e) => e.public_message(),
        }
    }
}

impl_into_response!(OverviewError);

/// Get current weather and the daily forecast in one call
///
/// GET /api/v1/overview?location=London,UK&days=3
///
/// Both upstream fetches run concurrently after a single geocoding lookup.
#[utoipa::path(
    get,
    path = "/api/v1/overview",
    tag = "forecast",
    params(
        ("location" = String, Query, description = "Free-text location, e.g. \"London, UK\""),
        ("days" = Option<i64>, Query, description = "Number of days starting tomorrow")
    ),
    responses(
        (status = 200, description = "Current weather and daily forecast", body = OverviewResponse),
        (status = 400, description = "Invalid parameters or unknown location", body = ErrorResponse),
        (status = 500, description = "Weather data unavailable", body = ErrorResponse)
    )
)]
pub async fn get_overview(
    State(state): State<AppState>,
    params: ForecastParams,
) -> Result<Json<OverviewResponse>, OverviewError> {
    let location = state.forecast_service.locate(&params.location).await?;

    let current = async {
        state
            .weather_service
            .current_weather(location.lat, location.lon)
            .await
            .map_err(OverviewError::from)
    };
    let daily = async {
        state
            .forecast_service
            .get_daily_forecast(location.lat, location.lon, params.days)
            .await
            .map_err(OverviewError::from)
    };

    let (weather, daily) = tokio::try_join!(current, daily)?;

    Ok(Json(OverviewResponse {
        geocoded_location: location,
        weather,
        daily,
    }))
}
