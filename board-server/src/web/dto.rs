//! JSON response types for the board API.

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::board::{BoardState, BoardView};
use crate::config::BoardVariant;

/// Response for `GET /api/board`.
#[derive(Debug, Serialize)]
pub struct BoardResponse {
    /// "grouped" or "countdown"
    pub variant: &'static str,

    /// Start of the last successful poll, local time
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,

    /// The page currently on screen
    #[serde(flatten)]
    pub view: BoardView,
}

impl BoardResponse {
    pub fn new(variant: BoardVariant, state: &BoardState, view: BoardView) -> Self {
        Self {
            variant: variant_name(variant),
            updated_at: state.updated_at.as_ref().map(format_timestamp),
            view,
        }
    }
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

fn variant_name(variant: BoardVariant) -> &'static str {
    match variant {
        BoardVariant::Grouped => "grouped",
        BoardVariant::Countdown => "countdown",
    }
}

fn format_timestamp(at: &NaiveDateTime) -> String {
    at.format("%Y-%m-%dT%H:%M:%S").to_string()
}
