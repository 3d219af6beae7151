//! Weather HTTP client.

use serde::{Deserialize, Serialize};

use super::error::WeatherError;
use super::source::WeatherSource;

/// Default base URL of the weather endpoint.
const DEFAULT_BASE_URL: &str = "http://localhost:8080";

/// Current conditions at a location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    /// Textual condition, e.g. "light rain".
    pub description: String,
    /// Temperature in degrees Celsius.
    pub temperature: f64,
}

impl WeatherReport {
    /// Temperature rounded to whole degrees, e.g. "-3°C".
    pub fn temperature_display(&self) -> String {
        // Avoid "-0°C" for small negative readings.
        let rounded = self.temperature.round();
        let rounded = if rounded == 0.0 { 0.0 } else { rounded };
        format!("{rounded:.0}°C")
    }
}

/// Configuration for the weather client.
#[derive(Debug, Clone)]
pub struct WeatherConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl WeatherConfig {
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 10,
        }
    }

    /// Set a custom base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Weather endpoint client.
#[derive(Debug, Clone)]
pub struct WeatherClient {
    http: reqwest::Client,
    base_url: String,
}

impl WeatherClient {
    pub fn new(config: WeatherConfig) -> Result<Self, WeatherError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
        })
    }
}

impl WeatherSource for WeatherClient {
    async fn current(&self, location: &str) -> Result<WeatherReport, WeatherError> {
        let url = format!("{}/weather", self.base_url);

        let response = self
            .http
            .get(&url)
            .query(&[("location", location)])
            .send()
            .await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(WeatherError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;

        serde_json::from_str(&body).map_err(|e| WeatherError::Json {
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(temperature: f64) -> WeatherReport {
        WeatherReport {
            description: "clear sky".into(),
            temperature,
        }
    }

    #[test]
    fn temperature_rounding() {
        assert_eq!(report(12.4).temperature_display(), "12°C");
        assert_eq!(report(12.6).temperature_display(), "13°C");
        assert_eq!(report(-3.2).temperature_display(), "-3°C");
        assert_eq!(report(-0.3).temperature_display(), "0°C");
    }

    #[test]
    fn parse_report() {
        let json = r#"{"description": "mgła", "temperature": 4.5, "humidity": 93}"#;
        let report: WeatherReport = serde_json::from_str(json).unwrap();
        assert_eq!(report.description, "mgła");
        assert_eq!(report.temperature, 4.5);
    }

    #[test]
    fn config_strips_trailing_slash() {
        let config = WeatherConfig::new().with_base_url("http://weather.local/");
        assert_eq!(config.base_url, "http://weather.local");
        assert!(WeatherClient::new(config).is_ok());
    }
}
