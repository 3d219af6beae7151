//! Turning board state into what is on screen.

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::config::BoardVariant;
use crate::domain::{Departure, Mode, group_by_destination, minutes_until_departure};
use crate::weather::WeatherReport;

use super::state::{BoardState, BoardStatus};

/// Shown before the first poll completes.
pub const LOADING_MESSAGE: &str = "Ładowanie danych...";

/// Shown after a failed poll.
pub const ERROR_MESSAGE: &str = "Błąd podczas ładowania danych";

/// One line of the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DepartureRow {
    /// Line label or train number.
    pub route: String,
    pub mode: Mode,
    pub icon: &'static str,
    pub destination: String,
    /// Local departure time, "HH:MM".
    pub time: String,
    /// Minutes until departure (countdown board only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minutes_until: Option<u32>,
}

impl DepartureRow {
    fn new(departure: &Departure, now: Option<NaiveDateTime>) -> Self {
        Self {
            route: departure.route.label().to_string(),
            mode: departure.mode,
            icon: departure.mode.icon(),
            destination: departure.destination.clone(),
            time: departure.clock_time(),
            minutes_until: now.map(|now| minutes_until_departure(now, departure.departure_time)),
        }
    }
}

/// Position of the current page among all pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PagePosition {
    /// 1-based page number.
    pub page: usize,
    pub pages: usize,
}

/// What the board shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum BoardView {
    Loading {
        message: &'static str,
    },
    Error {
        message: &'static str,
    },
    /// A poll succeeded but there are no stops to show.
    Empty,
    /// One destination of one stop.
    Grouped {
        stop: String,
        position: PagePosition,
        /// `None` when the stop has no departures.
        destination: Option<String>,
        rows: Vec<DepartureRow>,
    },
    /// Every departure of one stop with countdowns.
    Countdown {
        stop: String,
        position: PagePosition,
        rows: Vec<DepartureRow>,
        #[serde(skip_serializing_if = "Option::is_none")]
        weather: Option<WeatherReport>,
    },
}

/// Select and format the current page.
pub fn build_view(state: &BoardState, variant: BoardVariant, now: NaiveDateTime) -> BoardView {
    let snapshot = match &state.status {
        BoardStatus::Loading => {
            return BoardView::Loading {
                message: LOADING_MESSAGE,
            };
        }
        BoardStatus::Failed(_) => {
            return BoardView::Error {
                message: ERROR_MESSAGE,
            };
        }
        BoardStatus::Ready(snapshot) => snapshot,
    };

    let (Some(index), Some(board)) = (
        state.rotation.stop_index(snapshot),
        state.rotation.selected_stop(snapshot),
    ) else {
        return BoardView::Empty;
    };

    let position = PagePosition {
        page: index + 1,
        pages: snapshot.len(),
    };

    match variant {
        BoardVariant::Grouped => {
            let groups = group_by_destination(board.departures());
            let selected = state
                .rotation
                .destination_index(board)
                .and_then(|i| groups.get(i));

            BoardView::Grouped {
                stop: board.name.clone(),
                position,
                destination: selected.map(|g| g.destination.to_string()),
                rows: selected
                    .map(|g| {
                        g.departures
                            .iter()
                            .map(|d| DepartureRow::new(d, None))
                            .collect()
                    })
                    .unwrap_or_default(),
            }
        }
        BoardVariant::Countdown => BoardView::Countdown {
            stop: board.name.clone(),
            position,
            rows: board
                .departures()
                .iter()
                .map(|d| DepartureRow::new(d, Some(now)))
                .collect(),
            weather: state.weather.clone(),
        },
    }
}
