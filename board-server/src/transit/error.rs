//! Transit client error types.

use crate::domain::TimeError;

/// Errors from fetching or decoding transit departures.
#[derive(Debug, thiserror::Error)]
pub enum TransitError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend returned an error status code
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Response body was not the expected JSON. `body` keeps the first
    /// 500 characters for the logs.
    #[error("JSON parse error: {message}")]
    Json {
        message: String,
        body: Option<String>,
    },

    /// A record carried a departure time we cannot resolve
    #[error("malformed departure: {0}")]
    Time(#[from] TimeError),

    /// Feed or station unknown to the backend
    #[error("no departures for {0}")]
    NotFound(String),
}
