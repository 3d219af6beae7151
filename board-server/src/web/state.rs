//! Application state for the web layer.

use crate::board::BoardReader;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Read access to the running board
    pub board: BoardReader,
}

impl AppState {
    pub fn new(board: BoardReader) -> Self {
        Self { board }
    }
}
