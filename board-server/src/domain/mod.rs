//! Domain types for the departure board.
//!
//! Raw backend records are converted into these types once, at the edge;
//! everything past the fetcher works with resolved timestamps and
//! classified modes.

mod departure;
mod mode;
mod snapshot;
mod stop;
mod time;

pub use departure::{Departure, Route};
pub use mode::{Mode, ModeRule, ModeTable};
pub use snapshot::{DestinationGroup, Snapshot, StopBoard, group_by_destination};
pub use stop::{FeedId, RailStation, StationId, Stop};
pub use time::{
    MINUTES_PER_DAY, TimeError, TimeToken, minute_of_day, minutes_until, minutes_until_departure,
    normalize_time,
};
