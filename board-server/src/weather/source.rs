//! Abstraction over where weather comes from.

use std::future::Future;

use super::client::WeatherReport;
use super::error::WeatherError;

/// A provider of current weather for a named location.
pub trait WeatherSource: Send + Sync + 'static {
    fn current(
        &self,
        location: &str,
    ) -> impl Future<Output = Result<WeatherReport, WeatherError>> + Send;
}

/// Placeholder for boards without a weather readout.
///
/// Uninhabited: a `None::<NoWeather>` can never be asked for a report.
#[derive(Debug, Clone, Copy)]
pub enum NoWeather {}

impl WeatherSource for NoWeather {
    async fn current(&self, _location: &str) -> Result<WeatherReport, WeatherError> {
        match *self {}
    }
}
