//! The running board.
//!
//! [`aggregate`] turns backend records into a [`Snapshot`](crate::domain::Snapshot),
//! [`BoardController`] keeps one current and rotates through it, and
//! [`BoardReader`] hands the current page to the web layer.

mod aggregate;
mod clock;
mod controller;
mod present;
mod rotation;
mod state;

pub use aggregate::{FetchError, build_snapshot};
pub use clock::{Clock, ManualClock, SystemClock};
pub use controller::{BoardController, BoardHandle, PollOutcome};
pub use present::{BoardView, DepartureRow, ERROR_MESSAGE, LOADING_MESSAGE, PagePosition, build_view};
pub use rotation::Rotation;
pub use state::{BoardReader, BoardState, BoardStatus};
