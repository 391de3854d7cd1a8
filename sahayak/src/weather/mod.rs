mod cache;
mod client;
mod prefetch;

pub use cache::TtlCache;
pub use client::WeatherClient;
pub use prefetch::WeatherPrefetcher;

use std::sync::Arc;
use std::time::Duration;

use crate::config::WeatherConfig;
use crate::error::{Result, SahayakError};
use crate::models::{Coordinates, WeatherBundle};

/// Weather lookups with a process-wide TTL cache in front of the
/// OpenWeather client.
///
/// A cold key may trigger concurrent redundant fetches from racing
/// requests; the last completed fetch wins the cache slot.
#[derive(Clone)]
pub struct WeatherService {
    client: Option<Arc<WeatherClient>>,
    cache: TtlCache<WeatherBundle>,
    reason: Option<String>,
}

impl WeatherService {
    pub fn new(config: Option<&WeatherConfig>) -> Self {
        let Some(config) = config else {
            return Self::unavailable("No weather configuration provided");
        };

        match WeatherClient::new(config) {
            Ok(client) => Self {
                client: Some(Arc::new(client)),
                cache: TtlCache::new(Duration::from_secs(config.cache_ttl_secs)),
                reason: None,
            },
            Err(e) => Self::unavailable(&format!("Weather client init failed: {e}")),
        }
    }

    pub fn unavailable(reason: &str) -> Self {
        Self {
            client: None,
            cache: TtlCache::new(Duration::from_secs(0)),
            reason: Some(reason.to_string()),
        }
    }

    pub fn is_available(&self) -> bool {
        self.client.is_some()
    }

    fn client(&self) -> Result<&WeatherClient> {
        self.client.as_deref().ok_or_else(|| {
            SahayakError::Weather(
                self.reason
                    .clone()
                    .unwrap_or_else(|| "Weather provider unavailable".to_string()),
            )
        })
    }

    pub async fn geocode(&self, city: &str) -> Result<Coordinates> {
        self.client()?.geocode(city).await
    }

    /// Current weather plus forecast for `coords`, served from cache when
    /// a fresh entry exists, otherwise fetched and cached.
    pub async fn bundle(&self, coords: Coordinates) -> Result<WeatherBundle> {
        let key = coords.cache_key();
        if let Some(bundle) = self.cache.get(&key) {
            tracing::debug!(key = %key, "Weather cache hit");
            return Ok(bundle);
        }

        tracing::debug!(key = %key, "Weather cache miss, fetching");
        let bundle = self.client()?.fetch_bundle(coords).await?;
        self.cache.put(key, bundle.clone());
        Ok(bundle)
    }

    /// Fetch and cache unconditionally, bypassing any fresh entry.
    /// Used by the prefetcher to keep popular cities warm.
    pub async fn refresh(&self, coords: Coordinates) -> Result<WeatherBundle> {
        let bundle = self.client()?.fetch_bundle(coords).await?;
        self.cache.put(coords.cache_key(), bundle.clone());
        Ok(bundle)
    }
}
