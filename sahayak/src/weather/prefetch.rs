use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::error::Result;
use crate::weather::WeatherService;

/// Background manager that periodically refreshes the weather cache for a
/// fixed list of cities, so dashboard requests for popular locations hit
/// warm entries instead of the upstream API.
#[derive(Clone)]
pub struct WeatherPrefetcher {
    weather: WeatherService,
    cities: Vec<String>,
    interval_secs: u64,
}

impl WeatherPrefetcher {
    pub fn new(weather: WeatherService, cities: Vec<String>, interval_secs: u64) -> Self {
        Self {
            weather,
            cities,
            interval_secs,
        }
    }

    pub fn interval_secs(&self) -> u64 {
        self.interval_secs
    }

    /// Prefetch loop: one pass immediately so the configured cities are
    /// warm from startup, then one pass per interval until cancelled.
    pub async fn run(&self, token: CancellationToken) {
        loop {
            match self.run_once().await {
                Ok(count) => debug!("Prefetched weather for {} cities", count),
                Err(e) => error!("Weather prefetch error: {}", e),
            }

            tokio::select! {
                _ = token.cancelled() => {
                    info!("Weather prefetcher shutting down...");
                    break;
                }
                _ = tokio::time::sleep(tokio::time::Duration::from_secs(self.interval_secs)) => {}
            }
        }
    }

    /// Run a single prefetch pass over the configured cities.
    ///
    /// Errors on individual cities are logged and skipped. Returns the
    /// number of cities successfully refreshed.
    pub async fn run_once(&self) -> Result<u64> {
        if !self.weather.is_available() {
            debug!("Weather prefetch skipped: provider unavailable");
            return Ok(0);
        }

        info!("Starting weather cache prefetch for {} cities", self.cities.len());

        let mut refreshed = 0u64;
        for city in &self.cities {
            match self.refresh_city(city).await {
                Ok(()) => {
                    refreshed += 1;
                    debug!(city = city.as_str(), "Weather cache refreshed");
                }
                Err(e) => {
                    warn!(city = city.as_str(), error = %e, "Weather prefetch failed, skipping");
                }
            }
        }

        info!("Weather prefetch complete: {}/{} cities", refreshed, self.cities.len());
        Ok(refreshed)
    }

    async fn refresh_city(&self, city: &str) -> Result<()> {
        let coords = self.weather.geocode(city).await?;
        self.weather.refresh(coords).await?;
        Ok(())
    }
}
