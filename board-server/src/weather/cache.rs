//! Caching layer for weather lookups.
//!
//! The board polls every minute but conditions change slowly, so reports
//! are kept for a TTL and shared across polls.

use std::time::Duration;

use moka::future::Cache as MokaCache;

use super::client::WeatherReport;
use super::error::WeatherError;
use super::source::WeatherSource;

/// Default TTL for cached reports.
pub const DEFAULT_WEATHER_TTL: Duration = Duration::from_secs(10 * 60);

/// Weather source with a per-location TTL cache.
pub struct CachedWeatherClient<W> {
    inner: W,
    reports: MokaCache<String, WeatherReport>,
}

impl<W: WeatherSource> CachedWeatherClient<W> {
    /// Wrap `inner`, caching reports for `ttl`.
    pub fn new(inner: W, ttl: Duration) -> Self {
        let reports = MokaCache::builder()
            .time_to_live(ttl)
            .max_capacity(16)
            .build();

        Self { inner, reports }
    }
}

impl<W: WeatherSource> WeatherSource for CachedWeatherClient<W> {
    async fn current(&self, location: &str) -> Result<WeatherReport, WeatherError> {
        if let Some(cached) = self.reports.get(location).await {
            return Ok(cached);
        }

        // Failures are not cached; the next poll retries.
        let report = self.inner.current(location).await?;
        self.reports
            .insert(location.to_string(), report.clone())
            .await;

        Ok(report)
    }
}
