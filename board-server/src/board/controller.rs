//! Poll and rotation timers.
//!
//! [`BoardController`] owns the shared state and runs three tasks once
//! started: a poll loop, a stop-rotation loop and, for the grouped board, a
//! destination-rotation loop. All of them stop together when the returned
//! [`BoardHandle`] is stopped or dropped.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tracing::{debug, info, warn};

use crate::config::BoardConfig;
use crate::transit::DepartureSource;
use crate::weather::{NoWeather, WeatherReport, WeatherSource};

use super::aggregate::build_snapshot;
use super::clock::Clock;
use super::state::{BoardReader, BoardState, BoardStatus};

/// Result of a single poll attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// The previous cycle was still running.
    Skipped,
    /// A new snapshot was stored.
    Updated { stops: usize, departures: usize },
    /// The cycle failed and the board now shows the error state.
    Failed,
}

/// Clears the in-flight flag when a poll cycle ends, however it ends.
struct InFlightGuard<'a>(&'a AtomicBool);

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Drives the board: polls the backend and advances the rotation.
pub struct BoardController<S, W = NoWeather> {
    source: S,
    weather: Option<W>,
    config: BoardConfig,
    clock: Arc<dyn Clock>,
    state: Arc<RwLock<BoardState>>,
    in_flight: AtomicBool,
}

impl<S: DepartureSource> BoardController<S, NoWeather> {
    /// Create a controller without a weather source.
    pub fn new(source: S, config: BoardConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            source,
            weather: None,
            config,
            clock,
            state: Arc::default(),
            in_flight: AtomicBool::new(false),
        }
    }
}

impl<S: DepartureSource, W: WeatherSource> BoardController<S, W> {
    /// Attach a weather source. Only consulted by variants that show weather.
    pub fn with_weather<W2: WeatherSource>(self, weather: W2) -> BoardController<S, W2> {
        BoardController {
            source: self.source,
            weather: Some(weather),
            config: self.config,
            clock: self.clock,
            state: self.state,
            in_flight: self.in_flight,
        }
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    /// A read-only handle for the web layer.
    pub fn reader(&self) -> BoardReader {
        BoardReader::new(
            Arc::clone(&self.state),
            self.config.variant,
            Arc::clone(&self.clock),
        )
    }

    /// Run one poll cycle unless one is already running.
    ///
    /// On success the snapshot is replaced wholesale; on failure it is
    /// discarded and the board shows the error state until the next
    /// successful cycle. Weather is looked up after the snapshot is stored
    /// and outside the in-flight guard.
    pub async fn poll_once(&self) -> PollOutcome {
        let Some(guard) = InFlightGuard::acquire(&self.in_flight) else {
            debug!("Previous poll still in flight, skipping");
            return PollOutcome::Skipped;
        };

        let started = self.clock.now();
        let snapshot = match build_snapshot(&self.source, &self.config, started).await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(error = %e, "Poll failed");
                self.state.write().await.status = BoardStatus::Failed(e.to_string());
                return PollOutcome::Failed;
            }
        };

        let stops = snapshot.len();
        let departures = snapshot.departure_count();
        {
            let mut state = self.state.write().await;
            state.status = BoardStatus::Ready(Arc::new(snapshot));
            state.updated_at = Some(started);
        }
        drop(guard);
        info!(stops, departures, "Board updated");

        if let Some(report) = self.fetch_weather().await {
            self.state.write().await.weather = Some(report);
        }

        PollOutcome::Updated { stops, departures }
    }

    /// Best-effort weather lookup. Failures keep the last good report.
    async fn fetch_weather(&self) -> Option<WeatherReport> {
        if !self.config.variant.shows_weather() {
            return None;
        }
        let weather = self.weather.as_ref()?;

        match weather.current(&self.config.weather_location).await {
            Ok(report) => Some(report),
            Err(e) => {
                warn!(location = %self.config.weather_location, error = %e, "Weather fetch failed");
                None
            }
        }
    }

    /// Show the next stop.
    pub async fn advance_stop(&self) {
        let mut state = self.state.write().await;
        let BoardState {
            status, rotation, ..
        } = &mut *state;
        rotation.advance_stop(status.snapshot());
        debug!(counters = ?rotation.counters(), "Advanced stop");
    }

    /// Show the next destination of the current stop.
    pub async fn advance_destination(&self) {
        let mut state = self.state.write().await;
        let BoardState {
            status, rotation, ..
        } = &mut *state;
        rotation.advance_destination(status.snapshot());
    }

    /// Spawn the timers.
    ///
    /// The first poll starts immediately; rotation ticks start one period
    /// in.
    pub fn start(self: &Arc<Self>) -> BoardHandle {
        let mut tasks = vec![tokio::spawn(Arc::clone(self).poll_loop())];

        let this = Arc::clone(self);
        tasks.push(spawn_ticker(self.config.stop_interval, move || {
            let this = Arc::clone(&this);
            async move { this.advance_stop().await }
        }));

        if self.config.variant.rotates_destinations() {
            let this = Arc::clone(self);
            tasks.push(spawn_ticker(self.config.destination_interval, move || {
                let this = Arc::clone(&this);
                async move { this.advance_destination().await }
            }));
        }

        info!(
            variant = ?self.config.variant,
            pages = self.config.page_count(),
            "Board started"
        );
        BoardHandle { tasks }
    }

    /// Each cycle runs as its own task. Ticks that arrive while a cycle is
    /// still running are skipped by the in-flight guard.
    async fn poll_loop(self: Arc<Self>) {
        let mut ticks = tokio::time::interval(self.config.poll_interval);
        ticks.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut cycles = JoinSet::new();

        loop {
            ticks.tick().await;
            while cycles.try_join_next().is_some() {}

            let this = Arc::clone(&self);
            cycles.spawn(async move {
                this.poll_once().await;
            });
        }
    }
}

fn spawn_ticker<F, Fut>(period: Duration, mut on_tick: F) -> JoinHandle<()>
where
    F: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    tokio::spawn(async move {
        let mut ticks = interval_at(Instant::now() + period, period);
        ticks.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            ticks.tick().await;
            on_tick().await;
        }
    })
}

/// Running board timers.
///
/// Dropping the handle stops them too.
pub struct BoardHandle {
    tasks: Vec<JoinHandle<()>>,
}

impl BoardHandle {
    /// Stop every timer and any poll cycle still in flight.
    pub fn stop(self) {
        drop(self);
    }
}

impl Drop for BoardHandle {
    fn drop(&mut self) {
        for task in &self.tasks {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::clock::ManualClock;
    use crate::board::present::{BoardView, ERROR_MESSAGE};
    use crate::config::BoardVariant;
    use crate::domain::Stop;
    use crate::transit::{MockTransitClient, StopDeparture};
    use crate::weather::WeatherError;
    use chrono::{NaiveDate, NaiveDateTime};
    use std::sync::Mutex;
    use std::sync::atomic::AtomicUsize;

    fn noon() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 15)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn record(line: &str, destination: &str, time: &str) -> StopDeparture {
        StopDeparture {
            line: line.into(),
            destination: destination.into(),
            departure_time: time.into(),
        }
    }

    fn config(variant: BoardVariant, stops: Vec<Stop>) -> BoardConfig {
        BoardConfig::default()
            .with_variant(variant)
            .with_stops(stops, vec![])
    }

    async fn two_stop_mock() -> MockTransitClient {
        let mock = MockTransitClient::new();
        mock.set_stop("1", vec![record("3", "Lotnisko", "12:10")]).await;
        mock.set_stop("2", vec![record("52", "Osowa Góra", "12:20")]).await;
        mock
    }

    fn controller(
        mock: &MockTransitClient,
        variant: BoardVariant,
        stops: Vec<Stop>,
    ) -> Arc<BoardController<MockTransitClient>> {
        Arc::new(BoardController::new(
            mock.clone(),
            config(variant, stops),
            Arc::new(ManualClock::new(noon())),
        ))
    }

    fn shown_stop(view: &BoardView) -> Option<&str> {
        match view {
            BoardView::Grouped { stop, .. } | BoardView::Countdown { stop, .. } => Some(stop),
            _ => None,
        }
    }

    #[derive(Clone)]
    struct StubWeather {
        result: Arc<Mutex<Result<WeatherReport, WeatherError>>>,
        calls: Arc<AtomicUsize>,
    }

    impl StubWeather {
        fn new(temperature: f64) -> Self {
            Self {
                result: Arc::new(Mutex::new(Ok(WeatherReport {
                    description: "pochmurno".into(),
                    temperature,
                }))),
                calls: Arc::default(),
            }
        }

        fn fail(&self) {
            *self.result.lock().unwrap() = Err(WeatherError::Api {
                status: 500,
                message: "down".into(),
            });
        }
    }

    impl WeatherSource for StubWeather {
        async fn current(&self, _location: &str) -> Result<WeatherReport, WeatherError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.result.lock().unwrap().clone()
        }
    }

    #[tokio::test]
    async fn loading_until_first_poll() {
        let mock = two_stop_mock().await;
        let board = controller(&mock, BoardVariant::Grouped, vec![Stop::new("A", ["1"])]);
        assert!(matches!(board.reader().view().await, BoardView::Loading { .. }));

        let outcome = board.poll_once().await;
        assert_eq!(
            outcome,
            PollOutcome::Updated {
                stops: 1,
                departures: 1
            }
        );
        let state = board.reader().state().await;
        assert_eq!(state.updated_at, Some(noon()));
    }

    #[tokio::test(start_paused = true)]
    async fn stop_rotation_moves_to_second_stop() {
        let mock = two_stop_mock().await;
        let board = controller(
            &mock,
            BoardVariant::Grouped,
            vec![Stop::new("A", ["1"]), Stop::new("B", ["2"])],
        );
        let reader = board.reader();
        let handle = board.start();

        tokio::time::sleep(Duration::from_millis(1)).await;
        assert_eq!(shown_stop(&reader.view().await), Some("A"));

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(shown_stop(&reader.view().await), Some("B"));

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(shown_stop(&reader.view().await), Some("A"));

        handle.stop();
    }

    #[tokio::test(start_paused = true)]
    async fn single_stop_stays_selected() {
        let mock = two_stop_mock().await;
        let board = controller(&mock, BoardVariant::Grouped, vec![Stop::new("A", ["1"])]);
        let reader = board.reader();
        let _handle = board.start();

        tokio::time::sleep(Duration::from_secs(25)).await;
        assert_eq!(shown_stop(&reader.view().await), Some("A"));
        assert_eq!(reader.state().await.rotation.counters().0, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn destination_rotation_in_grouped_board() {
        let mock = MockTransitClient::new();
        mock.set_stop(
            "1",
            vec![
                record("3", "Lotnisko", "12:10"),
                record("5", "Fordon", "12:12"),
            ],
        )
        .await;
        let board = controller(&mock, BoardVariant::Grouped, vec![Stop::new("A", ["1"])]);
        let reader = board.reader();
        let _handle = board.start();

        let destination = |view: BoardView| match view {
            BoardView::Grouped { destination, .. } => destination,
            other => panic!("unexpected view {other:?}"),
        };

        tokio::time::sleep(Duration::from_millis(1)).await;
        assert_eq!(destination(reader.view().await).as_deref(), Some("Lotnisko"));

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(destination(reader.view().await).as_deref(), Some("Fordon"));
    }

    #[tokio::test(start_paused = true)]
    async fn countdown_board_does_not_rotate_destinations() {
        let mock = MockTransitClient::new();
        mock.set_stop(
            "1",
            vec![
                record("3", "Lotnisko", "12:10"),
                record("5", "Fordon", "12:12"),
            ],
        )
        .await;
        let board = controller(&mock, BoardVariant::Countdown, vec![Stop::new("A", ["1"])]);
        let reader = board.reader();
        let _handle = board.start();

        tokio::time::sleep(Duration::from_secs(7)).await;
        assert_eq!(reader.state().await.rotation.counters(), (0, 0));
    }

    #[tokio::test]
    async fn failure_discards_snapshot() {
        let mock = two_stop_mock().await;
        let board = controller(
            &mock,
            BoardVariant::Grouped,
            vec![Stop::new("A", ["1"]), Stop::new("B", ["2"])],
        );

        assert!(matches!(board.poll_once().await, PollOutcome::Updated { .. }));
        mock.fail("2").await;
        assert_eq!(board.poll_once().await, PollOutcome::Failed);

        let state = board.reader().state().await;
        assert!(state.status.snapshot().is_none());
        assert!(matches!(state.status, BoardStatus::Failed(ref e) if e.contains("feed 2")));
        assert_eq!(
            board.reader().view().await,
            BoardView::Error {
                message: ERROR_MESSAGE
            }
        );

        mock.recover("2").await;
        assert!(matches!(board.poll_once().await, PollOutcome::Updated { .. }));
        assert_eq!(shown_stop(&board.reader().view().await), Some("A"));
    }

    #[tokio::test(start_paused = true)]
    async fn overlapping_poll_is_skipped() {
        let mock = two_stop_mock().await;
        mock.set_delay(Some(Duration::from_secs(90))).await;
        let board = controller(&mock, BoardVariant::Grouped, vec![Stop::new("A", ["1"])]);

        let first = tokio::spawn({
            let board = Arc::clone(&board);
            async move { board.poll_once().await }
        });
        tokio::time::sleep(Duration::from_millis(1)).await;

        assert_eq!(board.poll_once().await, PollOutcome::Skipped);
        assert!(matches!(first.await.unwrap(), PollOutcome::Updated { .. }));
        assert_eq!(mock.request_count(), 1);

        mock.set_delay(None).await;
        assert!(matches!(board.poll_once().await, PollOutcome::Updated { .. }));
    }

    #[tokio::test]
    async fn countdown_board_shows_weather() {
        let mock = two_stop_mock().await;
        let weather = StubWeather::new(4.4);
        let board = Arc::new(
            BoardController::new(
                mock.clone(),
                config(BoardVariant::Countdown, vec![Stop::new("A", ["1"])]),
                Arc::new(ManualClock::new(noon())),
            )
            .with_weather(weather.clone()),
        );

        board.poll_once().await;
        let BoardView::Countdown { weather: shown, rows, .. } = board.reader().view().await else {
            panic!("expected countdown view");
        };
        assert_eq!(shown.unwrap().temperature_display(), "4°C");
        assert_eq!(rows[0].minutes_until, Some(10));

        weather.fail();
        assert!(matches!(board.poll_once().await, PollOutcome::Updated { .. }));
        let state = board.reader().state().await;
        assert_eq!(state.weather.unwrap().temperature, 4.4);
        assert_eq!(weather.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn slow_weather_does_not_hold_back_departures() {
        struct SlowWeather;

        impl WeatherSource for SlowWeather {
            async fn current(&self, _location: &str) -> Result<WeatherReport, WeatherError> {
                tokio::time::sleep(Duration::from_secs(10)).await;
                Err(WeatherError::Http("timed out".into()))
            }
        }

        let mock = MockTransitClient::new();
        mock.set_stop("1", vec![record("3", "Lotnisko", "5min")]).await;
        let board = Arc::new(
            BoardController::new(
                mock,
                config(BoardVariant::Countdown, vec![Stop::new("A", ["1"])]),
                Arc::new(ManualClock::new(noon())),
            )
            .with_weather(SlowWeather),
        );
        let reader = board.reader();

        let poll = tokio::spawn({
            let board = Arc::clone(&board);
            async move { board.poll_once().await }
        });
        tokio::time::sleep(Duration::from_secs(5)).await;

        let BoardView::Countdown { rows, weather, .. } = reader.view().await else {
            panic!("departures should be shown while weather is pending");
        };
        assert_eq!(rows[0].minutes_until, Some(5));
        assert!(weather.is_none());

        // The in-flight flag is already released, so the next poll runs.
        assert_ne!(board.poll_once().await, PollOutcome::Skipped);
        assert!(matches!(poll.await.unwrap(), PollOutcome::Updated { .. }));
    }

    #[tokio::test]
    async fn grouped_board_ignores_weather() {
        let mock = two_stop_mock().await;
        let weather = StubWeather::new(20.0);
        let board = BoardController::new(
            mock,
            config(BoardVariant::Grouped, vec![Stop::new("A", ["1"])]),
            Arc::new(ManualClock::new(noon())),
        )
        .with_weather(weather.clone());

        board.poll_once().await;
        assert_eq!(weather.calls.load(Ordering::SeqCst), 0);
        assert!(board.reader().state().await.weather.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn stopping_halts_timers() {
        let mock = two_stop_mock().await;
        let board = controller(&mock, BoardVariant::Grouped, vec![Stop::new("A", ["1"])]);
        let handle = board.start();

        tokio::time::sleep(Duration::from_millis(1)).await;
        assert_eq!(mock.request_count(), 1);

        handle.stop();
        tokio::time::sleep(Duration::from_secs(180)).await;
        assert_eq!(mock.request_count(), 1);
    }
}
