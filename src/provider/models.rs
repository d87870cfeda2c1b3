use serde::Deserialize;

use crate::models::{GeoLocation, WeatherCondition, WeatherSample};

// ============================================================================
// OpenWeatherMap API Responses (Internal)
// Only the fields we use are deserialized
// ============================================================================

/// Entry of the direct geocoding response array
#[derive(Debug, Deserialize)]
pub struct OwmGeoLocation {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    pub country: String,
    pub state: Option<String>,
}

impl From<OwmGeoLocation> for GeoLocation {
    fn from(g: OwmGeoLocation) -> Self {
        GeoLocation {
            name: g.name,
            lat: g.lat,
            lon: g.lon,
            country: g.country,
            state: g.state,
        }
    }
}

/// Shared shape of `/data/2.5/weather` and each `/data/2.5/forecast` list item
#[derive(Debug, Deserialize)]
pub struct OwmSample {
    pub dt: i64,
    #[serde(default)]
    pub weather: Vec<OwmCondition>,
    pub main: OwmMain,
    pub wind: OwmWind,
}

#[derive(Debug, Deserialize)]
pub struct OwmCondition {
    pub id: u32,
    pub main: String,
    pub description: String,
    pub icon: String,
}

#[derive(Debug, Deserialize)]
pub struct OwmMain {
    pub temp: f64,
    pub humidity: u32,
}

#[derive(Debug, Deserialize)]
pub struct OwmWind {
    pub speed: f64,
    #[serde(default)]
    pub deg: u32,
}

#[derive(Debug, Deserialize)]
pub struct OwmForecastResponse {
    pub list: Vec<OwmSample>,
}

#[derive(Debug, Deserialize)]
pub struct OwmErrorBody {
    pub message: String,
}

impl From<OwmSample> for WeatherSample {
    fn from(s: OwmSample) -> Self {
        WeatherSample {
            timestamp: s.dt,
            temperature: s.main.temp,
            humidity: s.main.humidity,
            wind_speed: s.wind.speed,
            wind_direction: s.wind.deg,
            conditions: s
                .weather
                .into_iter()
                .map(|w| WeatherCondition {
                    id: w.id,
                    main: w.main,
                    description: w.description,
                    icon: w.icon,
                })
                .collect(),
        }
    }
}
