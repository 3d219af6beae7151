//! Web layer for the departure board.
//!
//! Serves the current board page as HTML for the kiosk browser and as JSON
//! for anything else that wants it.

mod dto;
mod routes;
mod state;
pub mod templates;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
pub use templates::*;
