//! Abstraction over where departures come from.

use std::future::Future;

use crate::domain::{FeedId, StationId};

use super::error::TransitError;
use super::types::{StopDeparture, TrainDeparture};

/// A provider of raw departure records.
///
/// Implemented by the HTTP [`TransitClient`](super::TransitClient) and by
/// [`MockTransitClient`](super::MockTransitClient) for tests and offline
/// development.
pub trait DepartureSource: Send + Sync + 'static {
    /// Departures from one bus/tram feed.
    fn stop_departures(
        &self,
        feed: &FeedId,
    ) -> impl Future<Output = Result<Vec<StopDeparture>, TransitError>> + Send;

    /// Departures from one railway station.
    fn train_departures(
        &self,
        station: &StationId,
    ) -> impl Future<Output = Result<Vec<TrainDeparture>, TransitError>> + Send;
}
