//! HTTP route handlers.

use askama::Template;
use axum::{
    Json, Router,
    extract::State,
    http::{StatusCode, Uri},
    response::{Html, IntoResponse, Response},
    routing::get,
};
use chrono::Datelike;
use tower_http::services::ServeDir;
use tracing::warn;

use super::dto::{BoardResponse, ErrorResponse};
use super::state::AppState;
use super::templates::BoardTemplate;

/// Create the application router.
///
/// `static_dir` is the path to the static assets directory.
pub fn create_router(state: AppState, static_dir: &str) -> Router {
    Router::new()
        .route("/", get(board_page))
        .route("/health", get(health))
        .route("/api/board", get(board_json))
        .nest_service("/static", ServeDir::new(static_dir))
        .fallback(not_found)
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// The board page. Reloads itself every few seconds.
async fn board_page(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let year = state.board.now().year();
    let template = BoardTemplate::new(&state.board.view().await, year);
    Ok(Html(template.render()?))
}

/// The current board page as JSON.
async fn board_json(State(state): State<AppState>) -> Json<BoardResponse> {
    let view = state.board.view().await;
    let snapshot = state.board.state().await;
    Json(BoardResponse::new(state.board.variant(), &snapshot, view))
}

async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound {
        message: format!("No route for {uri}"),
    }
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    NotFound { message: String },
    Internal { message: String },
}

impl From<askama::Error> for AppError {
    fn from(e: askama::Error) -> Self {
        AppError::Internal {
            message: format!("Template error: {e}"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        warn!(%status, %message, "Request failed");

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
