//! Board configuration.
//!
//! The stop list is fixed at build time; timing, variant and endpoints are
//! plain values with defaults, overridable from the environment in `main`.

use std::str::FromStr;
use std::time::Duration;

use chrono::Duration as ChronoDuration;

use crate::domain::{ModeTable, RailStation, Stop};

/// Bus and tram stops shown on the board, in display order.
pub const STOPS: &[(&str, &[&str])] = &[
    (
        "Akademicka / Kaliskiego",
        &["8084", "8060", "8083", "8095", "8096"],
    ),
    ("Kaliskiego / Politechnika", &["8062", "8063"]),
    ("Dworzec Politechnika", &["7028", "7027", "8062", "8063"]),
];

/// Railway stations shown after the stops, in display order.
pub const RAIL_STATIONS: &[(&str, &str)] = &[
    ("Bydgoszcz-Politechnika-Pociąg", "5100641"),
    ("Bydgoszcz Wschód", "5100648"),
];

/// Which board layout to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BoardVariant {
    /// Departures grouped by destination, rotating through destinations.
    #[default]
    Grouped,
    /// Flat list with minutes-until-departure, one-hour window and weather.
    Countdown,
}

impl BoardVariant {
    /// Whether departures beyond the look-ahead window are dropped.
    pub fn filters_window(&self) -> bool {
        matches!(self, BoardVariant::Countdown)
    }

    /// Whether the weather readout is shown.
    pub fn shows_weather(&self) -> bool {
        matches!(self, BoardVariant::Countdown)
    }

    /// Whether the destination rotation timer runs.
    pub fn rotates_destinations(&self) -> bool {
        matches!(self, BoardVariant::Grouped)
    }
}

impl FromStr for BoardVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "grouped" => Ok(BoardVariant::Grouped),
            "countdown" => Ok(BoardVariant::Countdown),
            other => Err(format!(
                "unknown board variant {other:?} (expected 'grouped' or 'countdown')"
            )),
        }
    }
}

/// How a stop's feeds are requested within a poll cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchStrategy {
    /// One feed at a time, in configuration order.
    #[default]
    Sequential,
    /// All of a stop's feeds at once; results are still merged in feed order.
    Concurrent,
}

/// Configuration for polling and rotation.
#[derive(Debug, Clone)]
pub struct BoardConfig {
    /// Stops in display order.
    pub stops: Vec<Stop>,

    /// Railway stations, shown after the stops.
    pub rail_stations: Vec<RailStation>,

    /// Bus/tram classification.
    pub modes: ModeTable,

    /// Layout variant.
    pub variant: BoardVariant,

    /// Feed request strategy.
    pub fetch_strategy: FetchStrategy,

    /// Time between poll cycles.
    pub poll_interval: Duration,

    /// Time each stop stays on screen.
    pub stop_interval: Duration,

    /// Time each destination stays on screen (grouped variant).
    pub destination_interval: Duration,

    /// Look-ahead window in minutes (countdown variant).
    pub window_mins: i64,

    /// Location name passed to the weather endpoint.
    pub weather_location: String,
}

impl BoardConfig {
    /// Set the layout variant.
    pub fn with_variant(mut self, variant: BoardVariant) -> Self {
        self.variant = variant;
        self
    }

    /// Set the feed request strategy.
    pub fn with_fetch_strategy(mut self, strategy: FetchStrategy) -> Self {
        self.fetch_strategy = strategy;
        self
    }

    /// Replace the stop list.
    pub fn with_stops(mut self, stops: Vec<Stop>, rail_stations: Vec<RailStation>) -> Self {
        self.stops = stops;
        self.rail_stations = rail_stations;
        self
    }

    /// Set the weather location.
    pub fn with_weather_location(mut self, location: impl Into<String>) -> Self {
        self.weather_location = location.into();
        self
    }

    /// Returns the look-ahead window as a Duration.
    pub fn window(&self) -> ChronoDuration {
        ChronoDuration::minutes(self.window_mins)
    }

    /// Total number of board pages.
    pub fn page_count(&self) -> usize {
        self.stops.len() + self.rail_stations.len()
    }
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            stops: STOPS
                .iter()
                .map(|(name, feeds)| Stop::new(*name, feeds.iter().copied()))
                .collect(),
            rail_stations: RAIL_STATIONS
                .iter()
                .map(|(name, station)| RailStation::new(*name, *station))
                .collect(),
            modes: ModeTable::default(),
            variant: BoardVariant::default(),
            fetch_strategy: FetchStrategy::default(),
            poll_interval: Duration::from_secs(60),
            stop_interval: Duration::from_secs(10),
            destination_interval: Duration::from_secs(5),
            window_mins: 60,
            weather_location: "Bydgoszcz".to_string(),
        }
    }
}
