//! Building a snapshot from the transit backend.
//!
//! One poll cycle requests every feed of every stop, then every rail
//! station, converts and (optionally) windows the records, and sorts each
//! stop's list. Any failure aborts the cycle: a partial snapshot is never
//! returned.

use chrono::NaiveDateTime;
use futures::future::try_join_all;
use tracing::debug;

use crate::config::{BoardConfig, FetchStrategy};
use crate::domain::{Departure, FeedId, StationId, Snapshot, Stop, StopBoard};
use crate::transit::{
    DepartureSource, StopDeparture, TransitError, convert_stop_departure,
    convert_train_departure,
};

/// Error from a poll cycle.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// A bus/tram feed could not be fetched or decoded
    #[error("stop {stop:?}, feed {feed}: {source}")]
    Feed {
        stop: String,
        feed: FeedId,
        #[source]
        source: TransitError,
    },

    /// A rail station could not be fetched or decoded
    #[error("station {name:?} ({station}): {source}")]
    Station {
        name: String,
        station: StationId,
        #[source]
        source: TransitError,
    },
}

/// Fetch everything and build a snapshot as of `now`.
///
/// With the window filter on, departures later than `now` plus the
/// configured window are dropped; a departure exactly at the boundary is
/// kept.
pub async fn build_snapshot<S: DepartureSource>(
    source: &S,
    config: &BoardConfig,
    now: NaiveDateTime,
) -> Result<Snapshot, FetchError> {
    let window_end = config
        .variant
        .filters_window()
        .then(|| now + config.window());
    let in_window = |d: &Departure| window_end.is_none_or(|end| d.departure_time <= end);

    let mut boards = Vec::with_capacity(config.page_count());

    for stop in &config.stops {
        let batches = fetch_stop(source, stop, config.fetch_strategy).await?;

        let mut departures = Vec::new();
        for (feed, records) in stop.feeds.iter().zip(batches) {
            for record in &records {
                let departure = convert_stop_departure(record, &config.modes, now).map_err(
                    |e| FetchError::Feed {
                        stop: stop.name.clone(),
                        feed: feed.clone(),
                        source: e.into(),
                    },
                )?;
                if in_window(&departure) {
                    departures.push(departure);
                }
            }
        }

        debug!(stop = %stop.name, departures = departures.len(), "Fetched stop");
        boards.push(StopBoard::new(stop.name.clone(), departures));
    }

    for rail in &config.rail_stations {
        let station_error = |source: TransitError| FetchError::Station {
            name: rail.name.clone(),
            station: rail.station.clone(),
            source,
        };

        let records = source
            .train_departures(&rail.station)
            .await
            .map_err(station_error)?;

        let mut departures = Vec::with_capacity(records.len());
        for record in &records {
            let departure =
                convert_train_departure(record, now).map_err(|e| station_error(e.into()))?;
            if in_window(&departure) {
                departures.push(departure);
            }
        }

        debug!(station = %rail.name, departures = departures.len(), "Fetched station");
        boards.push(StopBoard::new(rail.name.clone(), departures));
    }

    Ok(Snapshot::new(boards))
}

/// Fetch every feed of a stop, returning one batch per feed in feed order.
async fn fetch_stop<S: DepartureSource>(
    source: &S,
    stop: &Stop,
    strategy: FetchStrategy,
) -> Result<Vec<Vec<StopDeparture>>, FetchError> {
    let feed_error = |feed: &FeedId, source: TransitError| FetchError::Feed {
        stop: stop.name.clone(),
        feed: feed.clone(),
        source,
    };

    match strategy {
        FetchStrategy::Sequential => {
            let mut batches = Vec::with_capacity(stop.feeds.len());
            for feed in &stop.feeds {
                let records = source
                    .stop_departures(feed)
                    .await
                    .map_err(|e| feed_error(feed, e))?;
                batches.push(records);
            }
            Ok(batches)
        }
        FetchStrategy::Concurrent => {
            // Results come back in feed order; the first failure wins.
            let feed_error = &feed_error;
            try_join_all(stop.feeds.iter().map(|feed| async move {
                source
                    .stop_departures(feed)
                    .await
                    .map_err(|e| feed_error(feed, e))
            }))
            .await
        }
    }
}
