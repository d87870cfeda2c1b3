use serde::Serialize;
use utoipa::ToSchema;

use crate::models::{GeoLocation, WeatherSnapshot};

// ============================================================================
// API Response Models (External - what we return to clients)
// ============================================================================

/// Representative forecast for one calendar day
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct DailyForecastEntry {
    /// Calendar day as `YYYY-MM-DD` in the configured forecast timezone
    pub date: String,
    pub forecast: WeatherSnapshot,
}

/// Current conditions together with the daily outlook for one location
#[derive(Debug, Serialize, ToSchema)]
pub struct OverviewResponse {
    pub geocoded_location: GeoLocation,
    pub weather: WeatherSnapshot,
    pub daily: Vec<DailyForecastEntry>,
}
