use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

// ============================================================================
// Shared domain models
// These are the provider-neutral shapes the services work with
// ============================================================================

/// A geocoded location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct GeoLocation {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    pub country: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

/// One weather condition descriptor as reported upstream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct WeatherCondition {
    pub id: u32,
    pub main: String,
    pub description: String,
    pub icon: String,
}

/// One upstream-reported observation (current or 3-hour forecast step)
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherSample {
    /// Seconds since the Unix epoch
    pub timestamp: i64,
    pub temperature: f64,
    pub humidity: u32,
    pub wind_speed: f64,
    pub wind_direction: u32,
    /// Upstream may report several; the first one is the primary condition
    pub conditions: Vec<WeatherCondition>,
}

impl WeatherSample {
    /// Collapse the sample to its primary condition.
    ///
    /// Returns `None` when upstream reported no condition at all.
    pub fn into_snapshot(self) -> Option<WeatherSnapshot> {
        let condition = self.conditions.into_iter().next()?;
        Some(WeatherSnapshot {
            timestamp: self.timestamp,
            temperature: self.temperature,
            humidity: self.humidity,
            wind_speed: self.wind_speed,
            wind_direction: self.wind_direction,
            condition,
        })
    }
}

/// A weather sample normalized to exactly one condition descriptor
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct WeatherSnapshot {
    pub timestamp: i64,
    pub temperature: f64,
    pub humidity: u32,
    pub wind_speed: f64,
    pub wind_direction: u32,
    pub condition: WeatherCondition,
}

#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum CoordinateError {
    #[error("Invalid \"lat\" value, lat must be between -90 and 90 inclusive")]
    Latitude(f64),

    #[error("Invalid \"lon\" value, lon must be between -180 and 180 inclusive")]
    Longitude(f64),
}

/// Reject coordinates outside the WGS84 range before any upstream call
pub fn validate_coordinates(lat: f64, lon: f64) -> Result<(), CoordinateError> {
    if !(-90.0..=90.0).contains(&lat) {
        return Err(CoordinateError::Latitude(lat));
    }
    if !(-180.0..=180.0).contains(&lon) {
        return Err(CoordinateError::Longitude(lon));
    }
    Ok(())
}
