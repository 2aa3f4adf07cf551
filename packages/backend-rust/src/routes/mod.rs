mod health;
mod schedule;
mod tracks;
mod users;
mod words;

use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::Router;

use crate::response::{json_error, AppError};
use crate::state::AppState;

pub const USER_ID_HEADER: &str = "x-user-id";

pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .route(
            "/users/me",
            get(users::me).put(users::update_profile).fallback(fallback_handler),
        )
        .route(
            "/tracks/:track/words",
            get(tracks::list_words)
                .put(tracks::replace_words)
                .fallback(fallback_handler),
        )
        .route("/words", post(words::save_word).fallback(fallback_handler))
        .route("/words/due", get(words::due).fallback(fallback_handler))
        .route("/words/:word/known", put(words::mark_known).fallback(fallback_handler))
        .route(
            "/words/:word/reviews",
            post(words::record_review).fallback(fallback_handler),
        )
        .route("/words/:word/status", get(words::status).fallback(fallback_handler))
        .route(
            "/schedule",
            get(schedule::current)
                .post(schedule::initiate)
                .fallback(fallback_handler),
        )
        .route("/schedule/today", get(schedule::today).fallback(fallback_handler));

    Router::new()
        .nest("/health", health::router())
        .nest("/api", api)
        .fallback(fallback_handler)
        .with_state(state)
}

/// Caller identity; authentication happens upstream
pub(crate) fn user_id_from(headers: &HeaderMap) -> Result<String, AppError> {
    headers
        .get(USER_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .ok_or_else(|| AppError::unauthorized("missing X-User-Id header"))
}

async fn fallback_handler() -> Response {
    json_error(StatusCode::NOT_FOUND, "NOT_FOUND", "route not found").into_response()
}
