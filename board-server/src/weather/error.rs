//! Weather client error types.

/// Errors from the weather endpoint.
#[derive(Debug, Clone, thiserror::Error)]
pub enum WeatherError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(String),

    /// Endpoint returned an error status
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Failed to parse response JSON
    #[error("JSON parse error: {message}")]
    Json { message: String },
}

impl From<reqwest::Error> for WeatherError {
    fn from(err: reqwest::Error) -> Self {
        WeatherError::Http(err.to_string())
    }
}
