use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use chrono::SecondsFormat;
use serde::Serialize;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(root))
        .route("/live", get(live))
}

async fn root(State(state): State<AppState>) -> Response {
    let ok = state.db().ping().await;
    if !ok {
        tracing::warn!("health check: database unreachable");
    }

    let response = HealthResponse {
        database: if ok { "connected" } else { "disconnected" },
        timestamp: now_iso(&state),
        status: if ok { "ok" } else { "degraded" },
    };

    let status_code = if ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status_code, Json(response)).into_response()
}

async fn live(State(state): State<AppState>) -> Response {
    let response = LivenessResponse {
        status: "healthy",
        timestamp: now_iso(&state),
        uptime: state.uptime_seconds(),
        version: env!("CARGO_PKG_VERSION"),
    };
    Json(response).into_response()
}

fn now_iso(state: &AppState) -> String {
    state.now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[derive(Serialize)]
struct HealthResponse {
    database: &'static str,
    timestamp: String,
    status: &'static str,
}

#[derive(Serialize)]
struct LivenessResponse {
    status: &'static str,
    timestamp: String,
    uptime: u64,
    version: &'static str,
}
