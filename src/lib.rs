pub mod cache;
pub mod config;
pub mod error;
pub mod extractors;
pub mod forecast;
pub mod geocode;
pub mod models;
pub mod openapi;
pub mod provider;
pub mod routes;
pub mod weather;

use std::sync::Arc;

use ::config::ConfigError;

use crate::cache::GeoCache;
use crate::config::AppConfig;
use crate::forecast::{DailyAggregator, ForecastService};
use crate::geocode::Geocoder;
use crate::provider::WeatherProvider;
use crate::weather::WeatherService;

#[derive(Clone)]
pub struct AppState {
    pub weather_service: Arc<WeatherService>,
    pub forecast_service: Arc<ForecastService>,
    pub geo_cache: GeoCache,
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Wire the services around a weather provider
    pub fn new(config: AppConfig, provider: Arc<dyn WeatherProvider>) -> Result<Self, ConfigError> {
        let aggregator = DailyAggregator::new(config.forecast.tz()?, config.forecast.selection);
        let geo_cache = cache::create_geo_cache(config.geocode_cache_ttl());
        let geocoder = Arc::new(Geocoder::new(Arc::clone(&provider), geo_cache.clone()));

        let weather_service = Arc::new(WeatherService::new(
            Arc::clone(&geocoder),
            Arc::clone(&provider),
        ));
        let forecast_service = Arc::new(ForecastService::new(geocoder, provider, aggregator));

        Ok(Self {
            weather_service,
            forecast_service,
            geo_cache,
            config: Arc::new(config),
        })
    }
}
