use async_trait::async_trait;
use reqwest::{Client, Response};

use super::models::{OwmErrorBody, OwmForecastResponse, OwmGeoLocation, OwmSample};
use super::{ProviderError, WeatherProvider};
use crate::models::{GeoLocation, WeatherSample};

const GEOCODING_PATH: &str = "/geo/1.0/direct";
const CURRENT_WEATHER_PATH: &str = "/data/2.5/weather";
const FORECAST_PATH: &str = "/data/2.5/forecast";

/// OpenWeatherMap client for the free-tier geocoding, weather and 5 day / 3 hour forecast APIs
pub struct OpenWeatherClient {
    client: Client,
    api_key: String,
    base_url: String,
    units: String,
}

impl OpenWeatherClient {
    pub fn new(client: Client, api_key: &str, base_url: &str, units: &str) -> Self {
        Self {
            client,
            api_key: api_key.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
            units: units.to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Turn non-success statuses into `ProviderError`, passing successful responses through
    async fn check_status(response: Response) -> Result<Response, ProviderError> {
        let status = response.status();
        tracing::debug!(status = %status, url = %response.url().path(), "Received OpenWeatherMap response");

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(ProviderError::Unauthorized);
        }

        if !status.is_success() {
            let message = match response.json::<OwmErrorBody>().await {
                Ok(body) => body.message,
                Err(_) => format!("HTTP {}", status),
            };
            return Err(ProviderError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response)
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherClient {
    async fn geocode(&self, location: &str) -> Result<Option<GeoLocation>, ProviderError> {
        tracing::debug!(location = %location, "Geocoding location");

        // Query builder handles URL encoding of spaces and commas
        let response = self
            .client
            .get(self.url(GEOCODING_PATH))
            .query(&[("q", location), ("limit", "1"), ("appid", self.api_key.as_str())])
            .send()
            .await?;

        let locations: Vec<OwmGeoLocation> = Self::check_status(response).await?.json().await?;

        // The first match is the most relevant one for the query
        Ok(locations.into_iter().next().map(GeoLocation::from))
    }

    async fn current_weather(&self, lat: f64, lon: f64) -> Result<WeatherSample, ProviderError> {
        tracing::debug!(lat = %lat, lon = %lon, "Fetching current weather");

        let response = self
            .client
            .get(self.url(CURRENT_WEATHER_PATH))
            .query(&[
                ("lat", lat.to_string()),
                ("lon", lon.to_string()),
                ("units", self.units.clone()),
                ("appid", self.api_key.clone()),
            ])
            .send()
            .await?;

        let data: OwmSample = Self::check_status(response).await?.json().await?;
        Ok(data.into())
    }

    async fn forecast_samples(
        &self,
        lat: f64,
        lon: f64,
    ) -> Result<Vec<WeatherSample>, ProviderError> {
        tracing::debug!(lat = %lat, lon = %lon, "Fetching 3-hourly forecast");

        let response = self
            .client
            .get(self.url(FORECAST_PATH))
            .query(&[
                ("lat", lat.to_string()),
                ("lon", lon.to_string()),
                ("units", self.units.clone()),
                ("appid", self.api_key.clone()),
            ])
            .send()
            .await?;

        let data: OwmForecastResponse = Self::check_status(response).await?.json().await?;

        tracing::debug!(samples = data.list.len(), "Forecast samples received");

        Ok(data.list.into_iter().map(WeatherSample::from).collect())
    }
}
