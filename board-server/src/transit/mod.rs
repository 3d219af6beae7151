//! Transit backend client.
//!
//! The backend exposes two JSON endpoints:
//! - `GET /departures?stopId={feed}` for bus and tram poles, each record
//!   carrying a line label
//! - `GET /train/departures?station={id}` for railway stations, each record
//!   carrying a train number
//!
//! Both report departure times as raw tokens (`">>"`, `"<N>min"` or
//! `"HH:MM"`) which are resolved in [`convert`].

mod client;
mod convert;
mod error;
mod mock;
mod source;
mod types;

pub use client::{TransitClient, TransitConfig};
pub use convert::{convert_stop_departure, convert_train_departure};
pub use error::TransitError;
pub use mock::MockTransitClient;
pub use source::DepartureSource;
pub use types::{StopDeparture, TrainDeparture};
