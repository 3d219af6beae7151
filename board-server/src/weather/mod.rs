//! Weather readout for the countdown board.
//!
//! Weather is best-effort: failures are logged by the caller and never
//! affect the departures flow.

mod cache;
mod client;
mod error;
mod source;

pub use cache::{CachedWeatherClient, DEFAULT_WEATHER_TTL};
pub use client::{WeatherClient, WeatherConfig, WeatherReport};
pub use error::WeatherError;
pub use source::{NoWeather, WeatherSource};
