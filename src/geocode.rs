use std::sync::Arc;

use crate::cache::{normalize_location_key, GeoCache};
use crate::models::GeoLocation;
use crate::provider::{ProviderError, WeatherProvider};

/// Location lookup shared by the weather and forecast services, cached for the configured TTL
pub struct Geocoder {
    provider: Arc<dyn WeatherProvider>,
    cache: GeoCache,
}

impl Geocoder {
    pub fn new(provider: Arc<dyn WeatherProvider>, cache: GeoCache) -> Self {
        Self { provider, cache }
    }

    /// Resolve free text to a location. Misses are not cached.
    pub async fn resolve(&self, location: &str) -> Result<Option<GeoLocation>, ProviderError> {
        let key = normalize_location_key(location);

        if let Some(cached) = self.cache.get(&key) {
            tracing::debug!(location = %location, "Geocoding cache hit");
            return Ok(Some(cached));
        }

        tracing::debug!(location = %location, "Geocoding cache miss");

        let found = self.provider.geocode(location.trim()).await?;
        if let Some(found) = &found {
            self.cache.insert(key, found.clone());
        }

        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::create_geo_cache;
    use crate::models::WeatherSample;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    struct CountingProvider {
        calls: AtomicUsize,
        known: Option<GeoLocation>,
    }

    #[async_trait]
    impl WeatherProvider for CountingProvider {
        async fn geocode(&self, _location: &str) -> Result<Option<GeoLocation>, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.known.clone())
        }

        async fn current_weather(&self, _: f64, _: f64) -> Result<WeatherSample, ProviderError> {
            unreachable!("geocoder never fetches weather")
        }

        async fn forecast_samples(
            &self,
            _: f64,
            _: f64,
        ) -> Result<Vec<WeatherSample>, ProviderError> {
            unreachable!("geocoder never fetches forecasts")
        }
    }

    fn paris() -> GeoLocation {
        GeoLocation {
            name: "Paris".to_string(),
            lat: 48.8589,
            lon: 2.32,
            country: "FR".to_string(),
            state: Some("Ile-de-France".to_string()),
        }
    }

    #[tokio::test]
    async fn test_second_lookup_is_served_from_cache() {
        let provider = Arc::new(CountingProvider {
            calls: AtomicUsize::new(0),
            known: Some(paris()),
        });
        let geocoder = Geocoder::new(provider.clone(), create_geo_cache(Duration::from_secs(60)));

        assert_eq!(geocoder.resolve("Paris").await.unwrap(), Some(paris()));
        assert_eq!(geocoder.resolve("  PARIS ").await.unwrap(), Some(paris()));
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_unknown_location_is_not_cached() {
        let provider = Arc::new(CountingProvider {
            calls: AtomicUsize::new(0),
            known: None,
        });
        let geocoder = Geocoder::new(provider.clone(), create_geo_cache(Duration::from_secs(60)));

        assert_eq!(geocoder.resolve("Atlantis").await.unwrap(), None);
        assert_eq!(geocoder.resolve("Atlantis").await.unwrap(), None);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 2);
    }
}
