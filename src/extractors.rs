use axum::{
    extract::{FromRequestParts, Query},
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;

use crate::error::ErrorResponse;
use crate::AppState;

/// Raw query string for location-based endpoints; validated by the extractors below
#[derive(Debug, Default, Deserialize)]
pub struct LocationQuery {
    pub location: Option<String>,
    pub days: Option<String>,
}

/// Required `location` query parameter
#[derive(Debug)]
pub struct LocationParam(pub String);

/// `location` plus a `days` count bounded by the configured forecast limits
#[derive(Debug, PartialEq)]
pub struct ForecastParams {
    pub location: String,
    pub days: i64,
}

fn require_location(query: &LocationQuery) -> Result<String, ParamRejection> {
    match query.location.as_deref().map(str::trim) {
        Some(location) if !location.is_empty() => Ok(location.to_string()),
        _ => Err(ParamRejection::new("You must provide a location")),
    }
}

/// Validate forecast parameters against the route limits
pub fn parse_forecast_params(
    query: &LocationQuery,
    default_days: i64,
    max_days: i64,
) -> Result<ForecastParams, ParamRejection> {
    let location = require_location(query)?;

    let days = match query.days.as_deref().map(str::trim) {
        None | Some("") => default_days,
        Some(raw) => raw.parse::<i64>().map_err(|_| {
            ParamRejection::new("The value for days you have provided is not a number")
        })?,
    };

    if days < 1 {
        return Err(ParamRejection::new("The number of days must be at least 1"));
    }
    if days > max_days {
        return Err(ParamRejection::new(format!(
            "The number of days must be at most {}",
            max_days
        )));
    }

    Ok(ForecastParams { location, days })
}

async fn location_query(parts: &mut Parts, state: &AppState) -> Result<LocationQuery, ParamRejection> {
    Query::<LocationQuery>::from_request_parts(parts, state)
        .await
        .map(|Query(query)| query)
        .map_err(|e| ParamRejection::new(e.body_text()))
}

impl FromRequestParts<AppState> for LocationParam {
    type Rejection = ParamRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let query = location_query(parts, state).await?;
        require_location(&query).map(LocationParam)
    }
}

impl FromRequestParts<AppState> for ForecastParams {
    type Rejection = ParamRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let query = location_query(parts, state).await?;
        parse_forecast_params(
            &query,
            state.config.forecast.default_days,
            state.config.forecast.max_days,
        )
    }
}

/// Rejection type for query parameter validation failures
#[derive(Debug, PartialEq)]
pub struct ParamRejection(pub String);

impl ParamRejection {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

impl IntoResponse for ParamRejection {
    fn into_response(self) -> Response {
        tracing::debug!(reason = %self.0, "Invalid search params");
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::with_code(
                format!("Invalid search params. {}", self.0),
                "INVALID_PARAMS",
            )),
        )
            .into_response()
    }
}
