//! Shared board state.

use std::sync::Arc;

use chrono::NaiveDateTime;
use tokio::sync::RwLock;

use crate::config::BoardVariant;
use crate::domain::Snapshot;
use crate::weather::WeatherReport;

use super::clock::Clock;
use super::present::{BoardView, build_view};
use super::rotation::Rotation;

/// Outcome of the most recent poll.
#[derive(Debug, Clone, Default)]
pub enum BoardStatus {
    /// No poll has finished yet.
    #[default]
    Loading,
    /// The last poll succeeded.
    Ready(Arc<Snapshot>),
    /// The last poll failed; the previous snapshot is gone.
    Failed(String),
}

impl BoardStatus {
    /// The current snapshot, if the last poll succeeded.
    pub fn snapshot(&self) -> Option<&Snapshot> {
        match self {
            BoardStatus::Ready(snapshot) => Some(snapshot.as_ref()),
            _ => None,
        }
    }
}

/// Everything the presenter reads.
///
/// Written by the poll and rotation tasks, read by the web layer.
#[derive(Debug, Clone, Default)]
pub struct BoardState {
    pub status: BoardStatus,
    pub rotation: Rotation,
    pub weather: Option<WeatherReport>,
    /// Start instant of the last successful poll.
    pub updated_at: Option<NaiveDateTime>,
}

/// Read-only handle on the board, cheap to clone.
#[derive(Clone)]
pub struct BoardReader {
    state: Arc<RwLock<BoardState>>,
    variant: BoardVariant,
    clock: Arc<dyn Clock>,
}

impl BoardReader {
    pub(crate) fn new(
        state: Arc<RwLock<BoardState>>,
        variant: BoardVariant,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            state,
            variant,
            clock,
        }
    }

    /// What the board should show right now.
    pub async fn view(&self) -> BoardView {
        let state = self.state.read().await;
        build_view(&state, self.variant, self.clock.now())
    }

    /// A copy of the raw state.
    pub async fn state(&self) -> BoardState {
        self.state.read().await.clone()
    }

    pub fn variant(&self) -> BoardVariant {
        self.variant
    }

    /// The board's current time.
    pub fn now(&self) -> NaiveDateTime {
        self.clock.now()
    }
}
