use std::net::SocketAddr;
use std::sync::Arc;

use tracing::{info, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use board_server::board::{BoardController, SystemClock};
use board_server::config::{BoardConfig, BoardVariant};
use board_server::transit::{DepartureSource, MockTransitClient, TransitClient, TransitConfig};
use board_server::weather::{
    CachedWeatherClient, DEFAULT_WEATHER_TTL, WeatherClient, WeatherConfig, WeatherSource,
};
use board_server::web::{AppState, create_router};

/// Settings read from the environment.
struct Settings {
    transit_base_url: Option<String>,
    mock_dir: Option<String>,
    weather_base_url: Option<String>,
    weather_location: Option<String>,
    variant: BoardVariant,
    listen: SocketAddr,
    static_dir: String,
}

impl Settings {
    fn from_env() -> Self {
        let var = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty());

        let variant = var("BOARD_VARIANT")
            .map(|v| {
                v.parse::<BoardVariant>()
                    .unwrap_or_else(|e| panic!("BOARD_VARIANT: {e}"))
            })
            .unwrap_or_default();
        let listen = var("BOARD_LISTEN")
            .map(|v| {
                v.parse::<SocketAddr>()
                    .unwrap_or_else(|e| panic!("BOARD_LISTEN {v:?}: {e}"))
            })
            .unwrap_or_else(|| SocketAddr::from(([127, 0, 0, 1], 3000)));

        Self {
            transit_base_url: var("TRANSIT_BASE_URL"),
            mock_dir: var("TRANSIT_MOCK_DIR"),
            weather_base_url: var("WEATHER_BASE_URL"),
            weather_location: var("WEATHER_LOCATION"),
            variant,
            listen,
            static_dir: var("BOARD_STATIC_DIR").unwrap_or_else(|| "static".to_string()),
        }
    }

    fn board_config(&self) -> BoardConfig {
        let config = BoardConfig::default().with_variant(self.variant);
        match &self.weather_location {
            Some(location) => config.with_weather_location(location),
            None => config,
        }
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=info".into()),
        )
        .init();

    let settings = Settings::from_env();
    let config = settings.board_config();

    match &settings.mock_dir {
        Some(dir) => {
            let mock = MockTransitClient::from_dir(dir).expect("Failed to load mock departures");
            info!(dir = %dir, "Serving departures from mock data");
            attach_weather(mock, config, &settings).await;
        }
        None => {
            let mut transit_config = TransitConfig::new();
            if let Some(url) = &settings.transit_base_url {
                transit_config = transit_config.with_base_url(url);
            }
            let client = TransitClient::new(transit_config).expect("Failed to create transit client");
            info!(base_url = %client.base_url(), "Using transit backend");
            attach_weather(client, config, &settings).await;
        }
    }
}

async fn attach_weather<S: DepartureSource>(source: S, config: BoardConfig, settings: &Settings) {
    let controller = BoardController::new(source, config, Arc::new(SystemClock));

    if !settings.variant.shows_weather() {
        return serve(controller, settings).await;
    }

    match &settings.weather_base_url {
        Some(url) => {
            let client = WeatherClient::new(WeatherConfig::new().with_base_url(url))
                .expect("Failed to create weather client");
            let cached = CachedWeatherClient::new(client, DEFAULT_WEATHER_TTL);
            serve(controller.with_weather(cached), settings).await;
        }
        None => {
            warn!("WEATHER_BASE_URL not set, weather readout disabled");
            serve(controller, settings).await;
        }
    }
}

async fn serve<S: DepartureSource, W: WeatherSource>(
    controller: BoardController<S, W>,
    settings: &Settings,
) {
    let controller = Arc::new(controller);
    let handle = controller.start();

    let app = create_router(AppState::new(controller.reader()), &settings.static_dir);

    let listener = tokio::net::TcpListener::bind(settings.listen)
        .await
        .expect("Failed to bind listen address");
    info!(variant = ?settings.variant, "Departure board listening on http://{}", settings.listen);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!(error = %e, "Failed to listen for shutdown signal");
            }
        })
        .await
        .expect("Server error");

    handle.stop();
    info!("Shut down");
}
