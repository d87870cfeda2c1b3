use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

use super::service::{CurrentWeatherResponse, WeatherError};
use crate::error::ErrorResponse;
use crate::extractors::LocationParam;
use crate::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses((status = 200, description = "Service is up", body = HealthResponse))
)]
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Get current weather for a free-text location
///
/// GET /api/v1/weather?location=London,UK
#[utoipa::path(
    get,
    path = "/api/v1/weather",
    tag = "weather",
    params(
        ("location" = String, Query, description = "Free-text location, e.g. \"London, UK\"")
    ),
    responses(
        (status = 200, description = "Current weather", body = CurrentWeatherResponse),
        (status = 400, description = "Missing or unknown location", body = ErrorResponse),
        (status = 500, description = "Weather data unavailable", body = ErrorResponse)
    )
)]
pub async fn get_weather(
    State(state): State<AppState>,
    LocationParam(location): LocationParam,
) -> Result<Json<CurrentWeatherResponse>, WeatherError> {
    let weather = state.weather_service.weather_for_location(&location).await?;
    Ok(Json(weather))
}
