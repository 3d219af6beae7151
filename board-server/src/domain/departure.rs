//! Normalized departures.

use chrono::NaiveDateTime;

use super::mode::Mode;

/// What identifies the vehicle on the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Bus or tram line label, e.g. "3" or "N1".
    Line(String),
    /// Train number, e.g. "IC 3821".
    Train(String),
}

impl Route {
    /// The label shown in the first board column.
    pub fn label(&self) -> &str {
        match self {
            Route::Line(s) | Route::Train(s) => s,
        }
    }
}

/// A single upcoming departure with its time already resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Departure {
    pub route: Route,
    pub destination: String,
    pub departure_time: NaiveDateTime,
    pub mode: Mode,
}

impl Departure {
    /// Departure time formatted for the board ("HH:MM").
    pub fn clock_time(&self) -> String {
        self.departure_time.format("%H:%M").to_string()
    }
}
