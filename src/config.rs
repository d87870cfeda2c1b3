use std::time::Duration;

use chrono_tz::Tz;
use config::{Case, Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::forecast::service::{MAX_FORECAST_DAYS, MIN_FORECAST_DAYS};
use crate::forecast::SelectionPolicy;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// OpenWeatherMap API key
    pub openweathermap_api_key: String,

    /// OpenWeatherMap base URL (overridable for testing)
    #[serde(default = "default_base_url")]
    pub openweathermap_base_url: String,

    /// Measurement units: metric, imperial, or standard
    #[serde(default = "default_units")]
    pub units: String,

    /// Per-request timeout for the whole HTTP handler
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// How long successful geocoding lookups are cached
    #[serde(default = "default_geocode_cache_ttl_secs")]
    pub geocode_cache_ttl_secs: u64,

    /// Daily forecast settings
    #[serde(default)]
    pub forecast: ForecastConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ForecastConfig {
    /// IANA zone used for day boundaries and the mid-day hour
    #[serde(default = "default_timezone")]
    pub timezone: String,

    /// Days returned when the caller does not ask for a count
    #[serde(default = "default_days")]
    pub default_days: i64,

    /// Largest day count accepted from callers
    #[serde(default = "default_max_days")]
    pub max_days: i64,

    /// Representative sample selection
    #[serde(default)]
    pub selection: SelectionPolicy,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
            default_days: default_days(),
            max_days: default_max_days(),
            selection: SelectionPolicy::default(),
        }
    }
}

impl ForecastConfig {
    pub fn tz(&self) -> Result<Tz, ConfigError> {
        self.timezone.parse::<Tz>().map_err(|e| {
            ConfigError::Message(format!(
                "forecast.timezone \"{}\" is not a valid IANA zone: {}",
                self.timezone, e
            ))
        })
    }

    fn validate(&self) -> Result<(), ConfigError> {
        self.tz()?;

        if !(MIN_FORECAST_DAYS..=MAX_FORECAST_DAYS).contains(&self.max_days) {
            return Err(ConfigError::Message(format!(
                "forecast.max_days must be between {} and {}, got {}",
                MIN_FORECAST_DAYS, MAX_FORECAST_DAYS, self.max_days
            )));
        }

        if !(MIN_FORECAST_DAYS..=self.max_days).contains(&self.default_days) {
            return Err(ConfigError::Message(format!(
                "forecast.default_days must be between {} and forecast.max_days ({}), got {}",
                MIN_FORECAST_DAYS, self.max_days, self.default_days
            )));
        }

        Ok(())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            openweathermap_api_key: String::new(),
            openweathermap_base_url: default_base_url(),
            units: default_units(),
            request_timeout_secs: default_request_timeout_secs(),
            geocode_cache_ttl_secs: default_geocode_cache_ttl_secs(),
            forecast: ForecastConfig::default(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_base_url() -> String {
    "https://api.openweathermap.org".to_string()
}

fn default_units() -> String {
    "metric".to_string()
}

fn default_request_timeout_secs() -> u64 {
    60
}

fn default_geocode_cache_ttl_secs() -> u64 {
    24 * 60 * 60
}

/// Fixed UTC+1 without DST: OpenWeatherMap's 12:00 UTC step lands on 13:00 local all year
fn default_timezone() -> String {
    "Etc/GMT-1".to_string()
}

fn default_days() -> i64 {
    3
}

fn default_max_days() -> i64 {
    5
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present
        let _ = dotenvy::dotenv();

        let config = Config::builder()
            // Start with default values
            .set_default("host", default_host())?
            .set_default("port", default_port())?
            .set_default("units", default_units())?
            // Load from config file if present
            .add_source(File::with_name("config").required(false))
            .add_source(File::with_name("config.local").required(false))
            // Override with environment variables (prefixed with SKYCAST_)
            // Nested keys use a double underscore: SKYCAST_FORECAST__MAX_DAYS
            .add_source(
                Environment::with_prefix("SKYCAST")
                    .prefix_separator("_")
                    .separator("__")
                    .convert_case(Case::Snake)
                    .try_parsing(true),
            )
            .build()?;

        let config: Self = config.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.openweathermap_api_key.trim().is_empty() {
            return Err(ConfigError::Message(
                "openweathermap_api_key must be set (SKYCAST_OPENWEATHERMAP_API_KEY)".to_string(),
            ));
        }
        self.forecast.validate()
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn geocode_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.geocode_cache_ttl_secs)
    }
}
