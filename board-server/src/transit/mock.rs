//! Mock transit client for testing without a backend.
//!
//! Serves departure records from memory, optionally loaded from a directory
//! of JSON files, and can be told to fail individual feeds.

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use tokio::sync::RwLock;

use crate::domain::{FeedId, StationId};

use super::error::TransitError;
use super::source::DepartureSource;
use super::types::{StopDeparture, TrainDeparture};

#[derive(Default)]
struct MockData {
    stops: HashMap<FeedId, Vec<StopDeparture>>,
    stations: HashMap<StationId, Vec<TrainDeparture>>,
    failing: HashSet<String>,
    delay: Option<Duration>,
}

/// Mock transit client that serves canned records.
///
/// Clones share the same data, so a test can keep one handle to reconfigure
/// feeds while the board controller polls another.
#[derive(Clone, Default)]
pub struct MockTransitClient {
    data: Arc<RwLock<MockData>>,
    requests: Arc<AtomicUsize>,
}

impl MockTransitClient {
    /// Create an empty mock. Every feed is unknown until added.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load records from a directory.
    ///
    /// Expects `{feedId}.json` files holding stop departures and
    /// `train-{stationId}.json` files holding train departures.
    pub fn from_dir(data_dir: impl AsRef<Path>) -> Result<Self, TransitError> {
        let data_dir = data_dir.as_ref();
        let mut data = MockData::default();

        let entries = std::fs::read_dir(data_dir).map_err(|e| TransitError::Api {
            status: 0,
            message: format!("Failed to read mock data directory: {e}"),
        })?;

        for entry in entries {
            let entry = entry.map_err(|e| TransitError::Api {
                status: 0,
                message: format!("Failed to read directory entry: {e}"),
            })?;

            let path = entry.path();
            if !path.is_file() || path.extension().and_then(|s| s.to_str()) != Some("json") {
                continue;
            }

            let stem = path
                .file_stem()
                .and_then(|s| s.to_str())
                .ok_or_else(|| TransitError::Api {
                    status: 0,
                    message: format!("Invalid filename: {path:?}"),
                })?;

            let json = std::fs::read_to_string(&path).map_err(|e| TransitError::Api {
                status: 0,
                message: format!("Failed to read {path:?}: {e}"),
            })?;

            let parse_error = |e: serde_json::Error| TransitError::Json {
                message: format!("{path:?}: {e}"),
                body: None,
            };

            match stem.strip_prefix("train-") {
                Some(station) => {
                    let records = serde_json::from_str(&json).map_err(parse_error)?;
                    data.stations.insert(StationId::new(station), records);
                }
                None => {
                    let records = serde_json::from_str(&json).map_err(parse_error)?;
                    data.stops.insert(FeedId::new(stem), records);
                }
            }
        }

        if data.stops.is_empty() && data.stations.is_empty() {
            return Err(TransitError::Api {
                status: 0,
                message: format!("No mock departure files found in {data_dir:?}"),
            });
        }

        Ok(Self {
            data: Arc::new(RwLock::new(data)),
            requests: Arc::default(),
        })
    }

    /// Set the records served for a feed.
    pub async fn set_stop(&self, feed: impl Into<String>, records: Vec<StopDeparture>) {
        let mut data = self.data.write().await;
        data.stops.insert(FeedId::new(feed), records);
    }

    /// Set the records served for a station.
    pub async fn set_station(&self, station: impl Into<String>, records: Vec<TrainDeparture>) {
        let mut data = self.data.write().await;
        data.stations.insert(StationId::new(station), records);
    }

    /// Make requests for a feed or station ID fail until [`Self::recover`].
    pub async fn fail(&self, id: impl Into<String>) {
        self.data.write().await.failing.insert(id.into());
    }

    /// Stop failing requests for an ID.
    pub async fn recover(&self, id: &str) {
        self.data.write().await.failing.remove(id);
    }

    /// Delay every response, simulating a slow network.
    pub async fn set_delay(&self, delay: Option<Duration>) {
        self.data.write().await.delay = delay;
    }

    /// Number of requests served (or failed) so far.
    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    /// Shared preamble: count, delay, and injected failure.
    async fn begin(&self, id: &str) -> Result<(), TransitError> {
        self.requests.fetch_add(1, Ordering::SeqCst);

        let (delay, failing) = {
            let data = self.data.read().await;
            (data.delay, data.failing.contains(id))
        };

        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if failing {
            return Err(TransitError::Api {
                status: 503,
                message: format!("injected failure for {id}"),
            });
        }
        Ok(())
    }
}

impl DepartureSource for MockTransitClient {
    async fn stop_departures(&self, feed: &FeedId) -> Result<Vec<StopDeparture>, TransitError> {
        self.begin(feed.as_str()).await?;
        let data = self.data.read().await;
        data.stops
            .get(feed)
            .cloned()
            .ok_or_else(|| TransitError::NotFound(format!("stopId={feed}")))
    }

    async fn train_departures(
        &self,
        station: &StationId,
    ) -> Result<Vec<TrainDeparture>, TransitError> {
        self.begin(station.as_str()).await?;
        let data = self.data.read().await;
        data.stations
            .get(station)
            .cloned()
            .ok_or_else(|| TransitError::NotFound(format!("station={station}")))
    }
}
